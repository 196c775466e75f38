//! Exact minimum vertex cover by a descending sequence of SAT queries.
//!
//! Starting at the size of a known cover (by default the degree-greedy one), the search asks the
//! oracle for a cover of size `k`, `k - 1`, ... and stops at the first unsatisfiable `k`; the
//! cover found for `k + 1` is then minimal. Every attempt encodes and solves from scratch.
//!
//! With a time budget each attempt runs on its own worker thread. If the budget runs out the
//! worker's interrupt flag is raised and its answer is dropped. The best cover confirmed so far is
//! returned as non-optimal. Oracles that ignore the flag keep their worker busy until they finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use crate::cnf::ClauseSet;
use crate::config::SolveConfig;
use crate::cover::Cover;
use crate::cust_error::ProcessingError;
use crate::graph::UGraph;
use crate::oracle::{OracleKind, SatOracle, SatResult};

/// Creates a fresh oracle for every attempt.
pub type OracleFactory = Arc<dyn Fn() -> Box<dyn SatOracle> + Send + Sync>;

/// Result of asking for a cover of one particular size.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AttemptOutcome {
    Satisfiable(Cover),
    Unsatisfiable,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct Attempt {
    pub k: usize,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The smallest cover confirmed. Minimal if `optimal` is set.
    pub cover: Cover,
    /// `false` if an attempt ran out of time before unsatisfiability was shown.
    pub optimal: bool,
    pub attempts: Vec<Attempt>,
}

pub struct MinimumCoverSearch {
    factory: OracleFactory,
    timeout: Option<Duration>,
}

impl MinimumCoverSearch {

    /// Creates a search using oracles of `kind`. With `timeout` set, each attempt gets that much
    /// wall-clock time.
    pub fn new(kind: OracleKind, timeout: Option<Duration>) -> Self {
        Self::with_factory(Arc::new(move || kind.build()), timeout)
    }

    pub fn with_factory(factory: OracleFactory, timeout: Option<Duration>) -> Self {
        MinimumCoverSearch { factory, timeout }
    }

    pub fn from_config(config: &SolveConfig) -> Self {
        Self::new(config.oracle, config.timeout)
    }

    /// Computes a minimum vertex cover of `graph`, seeded with the degree-greedy cover.
    pub fn minimum_cover(&self, graph: &UGraph) -> Result<SearchOutcome, ProcessingError> {
        self.minimum_cover_below(graph, graph.degree_greedy_cover())
    }

    /// Computes a minimum vertex cover of `graph`, searching downwards from the size of
    /// `upper_bound`. `upper_bound` is returned if no attempt confirms anything better.
    ///
    /// Fails with `ProcessingError::InvalidSolution` if `upper_bound` or a decoded model is not a
    /// cover of the claimed size.
    pub fn minimum_cover_below(&self, graph: &UGraph, upper_bound: Cover) -> Result<SearchOutcome, ProcessingError> {
        if let Some((src, trg)) = upper_bound.uncovered_edge(graph) {
            return Err(ProcessingError::InvalidSolution(
                format!("upper bound leaves <{},{}> uncovered", src, trg)))
        }
        let mut best = upper_bound;
        let mut attempts = Vec::new();
        let mut k = best.len();
        while k > 0 {
            let start = Instant::now();
            let outcome = self.attempt(graph, k)?;
            let elapsed = start.elapsed();
            tracing::debug!("k = {}: {:?} after {:?}", k, outcome, elapsed);
            match &outcome {
                AttemptOutcome::Satisfiable(cover) => {
                    if cover.len() != k || !cover.is_cover_of(graph) {
                        return Err(ProcessingError::InvalidSolution(
                            format!("model for k = {} decodes to `{}`", k, cover)))
                    }
                    best = cover.clone();
                },
                AttemptOutcome::Unsatisfiable => {
                    attempts.push(Attempt { k, outcome, elapsed });
                    return Ok(SearchOutcome { cover: best, optimal: true, attempts })
                },
                AttemptOutcome::TimedOut => {
                    tracing::info!("k = {} timed out, keeping cover of size {}", k, best.len());
                    attempts.push(Attempt { k, outcome, elapsed });
                    return Ok(SearchOutcome { cover: best, optimal: false, attempts })
                },
            }
            attempts.push(Attempt { k, outcome, elapsed });
            k -= 1;
        }
        // A cover of size 0 exists exactly if there are no edges.
        Ok(SearchOutcome { cover: best, optimal: true, attempts })
    }

    /// Asks a fresh oracle whether `graph` has a vertex cover of size exactly `k`.
    pub fn attempt(&self, graph: &UGraph, k: usize) -> Result<AttemptOutcome, ProcessingError> {
        let clauses = ClauseSet::encode(graph, k);
        let budget = match self.timeout {
            None => return run_attempt(&self.factory, &clauses, None),
            Some(budget) => budget,
        };
        let (sender, receiver) = mpsc::channel();
        let factory = Arc::clone(&self.factory);
        let interrupt = Arc::new(AtomicBool::new(false));
        let worker_interrupt = Arc::clone(&interrupt);
        thread::Builder::new()
            .name(format!("cover-k{}", k))
            .spawn(move || {
                // The receiver is gone if the attempt already timed out.
                let _ = sender.send(run_attempt(&factory, &clauses, Some(worker_interrupt)));
            })?;
        match receiver.recv_timeout(budget) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                interrupt.store(true, Ordering::Relaxed);
                Ok(AttemptOutcome::TimedOut)
            },
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ProcessingError::WorkerLost),
        }
    }
}

fn run_attempt(
    factory: &OracleFactory,
    clauses: &ClauseSet,
    interrupt: Option<Arc<AtomicBool>>,
) -> Result<AttemptOutcome, ProcessingError> {
    let mut oracle = factory();
    if let Some(flag) = interrupt {
        oracle.set_interrupt(flag);
    }
    let vars = clauses.load_into(oracle.as_mut());
    match oracle.solve()? {
        SatResult::Sat => Ok(AttemptOutcome::Satisfiable(clauses.decode(oracle.as_ref(), &vars))),
        SatResult::Unsat => Ok(AttemptOutcome::Unsatisfiable),
    }
}
