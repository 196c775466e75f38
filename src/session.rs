//! Line-oriented driver: reads `V`/`E` commands, keeps the current graph and reports the exact and
//! both greedy covers after every edge batch.
//!
//! Malformed lines and rejected edges are logged and skipped, only I/O errors end a session.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use crate::commands::{parse_line, Command};
use crate::config::SolveConfig;
use crate::cover::Cover;
use crate::cust_error::{GraphError, ProcessingError};
use crate::exact_search::MinimumCoverSearch;
use crate::graph::UGraph;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Algorithm {
    Exact,
    /// The exact search stopped early, the cover is the best one confirmed.
    NonOptimal,
    DegreeGreedy,
    EdgeGreedy,
}

impl Algorithm {
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Exact => "VC-EXACT",
            Algorithm::NonOptimal => "VC (non-optimal)",
            Algorithm::DegreeGreedy => "VC-GREEDY-1",
            Algorithm::EdgeGreedy => "VC-GREEDY-2",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportLine {
    pub algorithm: Algorithm,
    pub cover: Cover,
    pub elapsed: Duration,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.algorithm.label(), self.cover)
    }
}

/// Computes the three covers of `graph`: exact (or non-optimal), degree-greedy, edge-greedy.
///
/// The degree-greedy cover seeds the exact search. If the search fails that seed is reported as
/// the non-optimal result.
pub fn compute_report(graph: &UGraph, search: &MinimumCoverSearch) -> Vec<ReportLine> {
    let start = Instant::now();
    let degree_cover = graph.degree_greedy_cover();
    let degree_line = ReportLine {
        algorithm: Algorithm::DegreeGreedy,
        cover: degree_cover.clone(),
        elapsed: start.elapsed(),
    };

    let start = Instant::now();
    let edge_cover = graph.edge_greedy_cover();
    let edge_line = ReportLine {
        algorithm: Algorithm::EdgeGreedy,
        cover: edge_cover,
        elapsed: start.elapsed(),
    };

    let start = Instant::now();
    let (algorithm, cover) = match search.minimum_cover_below(graph, degree_cover.clone()) {
        Ok(outcome) if outcome.optimal => (Algorithm::Exact, outcome.cover),
        Ok(outcome) => (Algorithm::NonOptimal, outcome.cover),
        Err(e) => {
            tracing::error!("Exact search failed: {}", e);
            (Algorithm::NonOptimal, degree_cover)
        },
    };
    let exact_line = ReportLine { algorithm, cover, elapsed: start.elapsed() };

    vec![exact_line, degree_line, edge_line]
}

/// The state of one command session.
pub struct Session<R: Write = File> {
    graph: Option<UGraph>,
    search: MinimumCoverSearch,
    record: Option<R>,
}

impl Session<File> {

    /// Creates a session from `config`, opening its record file for appending.
    pub fn new(config: &SolveConfig) -> Result<Self, ProcessingError> {
        let record = match &config.record {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };
        Ok(Session::with_record(MinimumCoverSearch::from_config(config), record))
    }
}

impl<R: Write> Session<R> {

    pub fn with_record(search: MinimumCoverSearch, record: Option<R>) -> Self {
        Session { graph: None, search, record }
    }

    /// Returns the current graph, `None` before the first `V`.
    pub fn graph(&self) -> Option<&UGraph> {
        self.graph.as_ref()
    }

    pub fn record(&self) -> Option<&R> {
        self.record.as_ref()
    }

    /// Processes all lines of `input`, writing cover lines to `out`.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, mut out: W) -> Result<(), ProcessingError> {
        for line in input.lines() {
            self.handle_line(&line?, &mut out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Processes one command line.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<(), ProcessingError> {
        match parse_line(line) {
            Ok(None) => Ok(()),
            Ok(Some(Command::Vertices(n))) => {
                tracing::debug!("New graph with {} vertices", n);
                self.graph = Some(UGraph::new(n));
                if let Some(record) = self.record.as_mut() {
                    writeln!(record, "{}", n)?;
                }
                Ok(())
            },
            Ok(Some(Command::Edges(edges))) => {
                let graph = match self.graph.as_mut() {
                    Some(graph) => graph,
                    None => {
                        tracing::warn!("{}", GraphError::NoGraph);
                        return Ok(())
                    },
                };
                for e in graph.add_edges(edges.into_iter().map(|edge| (edge.src, edge.trg))) {
                    tracing::warn!("Dropping edge: {}", e);
                }
                let report = compute_report(graph, &self.search);
                self.write_report(&report, out)
            },
            Err(e) => {
                tracing::warn!("{}", e);
                Ok(())
            },
        }
    }

    /// Writes `report` to `out` in order. The record gets the greedy entries first and the exact
    /// entry last, each with its execution time in microseconds, then a blank line.
    fn write_report<W: Write>(&mut self, report: &[ReportLine], out: &mut W) -> Result<(), ProcessingError> {
        for line in report {
            writeln!(out, "{}", line)?;
        }
        if let Some(record) = self.record.as_mut() {
            let (exact, greedy) = match report.split_first() {
                Some(split) => split,
                None => return Ok(()),
            };
            for line in greedy.iter().chain(std::iter::once(exact)) {
                writeln!(record, "{}", line)?;
                writeln!(record, "Execution time: {}", line.elapsed.as_micros())?;
            }
            writeln!(record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread;
    use crate::exact_search::OracleFactory;
    use crate::oracle::{BacktrackOracle, Literal, OracleKind, SatOracle, SatResult, VarId};

    /// Either stalls for `delay` before answering, or fails outright.
    struct StubbornOracle {
        inner: BacktrackOracle,
        delay: Option<Duration>,
    }

    impl SatOracle for StubbornOracle {
        fn new_var(&mut self) -> VarId {
            self.inner.new_var()
        }

        fn add_clause(&mut self, literals: &[Literal]) {
            self.inner.add_clause(literals)
        }

        fn solve(&mut self) -> Result<SatResult, ProcessingError> {
            match self.delay {
                Some(delay) => {
                    thread::sleep(delay);
                    self.inner.solve()
                },
                None => Err(ProcessingError::Oracle("solver crashed".to_owned())),
            }
        }

        fn model_value(&self, var: VarId) -> bool {
            self.inner.model_value(var)
        }
    }

    fn stubborn_session(delay: Option<Duration>, timeout: Option<Duration>) -> Session<Vec<u8>> {
        let factory: OracleFactory = Arc::new(move || -> Box<dyn SatOracle> {
            Box::new(StubbornOracle { inner: BacktrackOracle::new(), delay })
        });
        Session::with_record(MinimumCoverSearch::with_factory(factory, timeout), None)
    }

    fn session() -> Session<Vec<u8>> {
        Session::with_record(MinimumCoverSearch::new(OracleKind::Varisat, None), None)
    }

    fn run(session: &mut Session<Vec<u8>>, input: &str) -> String {
        let mut out = Vec::new();
        session.run(Cursor::new(input.to_owned()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn path_session_test() {
        let out = run(&mut session(), "V 5\nE {<1,2>,<2,3>,<3,4>,<4,5>}\n");
        assert_eq!(out, "VC-EXACT: 2 4 (2)\nVC-GREEDY-1: 2 4 (2)\nVC-GREEDY-2: 2 3 4 5 (4)\n");
    }

    #[test]
    fn star_session_test() {
        let out = run(&mut session(), "V 4\nE {<1,2>,<1,3>,<1,4>}\n");
        assert_eq!(out, "VC-EXACT: 1 (1)\nVC-GREEDY-1: 1 (1)\nVC-GREEDY-2: 1 2 (2)\n");
    }

    #[test]
    fn empty_graph_session_test() {
        let out = run(&mut session(), "V 3\nE {}\n");
        assert_eq!(out, "VC-EXACT: (0)\nVC-GREEDY-1: (0)\nVC-GREEDY-2: (0)\n");
    }

    #[test]
    fn bad_lines_are_skipped_test() {
        let mut session = session();
        let out = run(&mut session, "E {<1,2>}\nX 3\nV 3\n\nE {<1,2>,<2,1>,<1,1>,<3,9>,<2,3,5>}\n");
        assert_eq!(out, "VC-EXACT: 2 (1)\nVC-GREEDY-1: 2 (1)\nVC-GREEDY-2: 1 2 (2)\n");
        assert_eq!(session.graph().unwrap().edges(), &[(1, 2), (2, 3)]);
    }

    #[test]
    fn edges_accumulate_until_next_v_test() {
        let mut session = session();
        let out = run(&mut session, "V 3\nE {<1,2>}\nE {<2,3>,<1,3>}\nV 2\nE {<1,2>}\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 9);
        // A single edge has two minimum covers, only the size is fixed.
        assert!(lines[0].starts_with("VC-EXACT: ") && lines[0].ends_with("(1)"));
        assert!(lines[3].starts_with("VC-EXACT: ") && lines[3].ends_with("(2)"));
        assert!(lines[6].ends_with("(1)"));
        assert_eq!(session.graph().unwrap().num_nodes(), 2);
    }

    #[test]
    fn timeout_reports_non_optimal_test() {
        let mut session = stubborn_session(Some(Duration::from_millis(300)), Some(Duration::from_millis(10)));
        let out = run(&mut session, "V 5\nE {<1,2>,<2,3>,<3,4>,<4,5>}\n");
        assert_eq!(out, "VC (non-optimal): 2 4 (2)\nVC-GREEDY-1: 2 4 (2)\nVC-GREEDY-2: 2 3 4 5 (4)\n");
    }

    #[test]
    fn oracle_failure_falls_back_to_seed_test() {
        let mut session = stubborn_session(None, None);
        let out = run(&mut session, "V 4\nE {<1,2>,<2,3>,<3,4>,<1,3>}\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let seed = session.graph().unwrap().degree_greedy_cover();
        assert_eq!(lines[0], format!("VC (non-optimal): {}", seed));
        assert_eq!(lines[1], format!("VC-GREEDY-1: {}", seed));
    }

    #[test]
    fn record_test() {
        let search = MinimumCoverSearch::new(OracleKind::Backtrack, None);
        let mut session = Session::with_record(search, Some(Vec::new()));
        let out = run(&mut session, "V 2\nE {<1,2>}\n");
        assert_eq!(out.lines().count(), 3);
        let record = String::from_utf8(session.record().unwrap().clone()).unwrap();
        let lines: Vec<&str> = record.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "VC-GREEDY-1: 1 (1)");
        assert!(lines[2].starts_with("Execution time: "));
        assert_eq!(lines[3], "VC-GREEDY-2: 1 2 (2)");
        assert!(lines[4].starts_with("Execution time: "));
        assert_eq!(lines[5], "VC-EXACT: 1 (1)");
        assert!(lines[6].starts_with("Execution time: "));
        assert_eq!(lines[7], "");
        assert_eq!(lines.len(), 8);
    }
}
