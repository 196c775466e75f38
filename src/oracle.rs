//! The Boolean satisfiability oracle the exact search talks to, and two implementations of it:
//! * `VarisatOracle`, a CDCL solver backed by `varisat`.
//! * `BacktrackOracle`, a small DPLL search with unit propagation. It is deterministic and only
//!   meant for small formulas, e.g. in tests.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use varisat::ExtendFormula;
use crate::cust_error::ProcessingError;

/// Handle of a variable handed out by a `SatOracle`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VarId(pub usize);

/// A variable together with its polarity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Literal {
    pub var: VarId,
    pub positive: bool,
}

impl Literal {
    pub fn positive(var: VarId) -> Self {
        Literal { var, positive: true }
    }

    pub fn negative(var: VarId) -> Self {
        Literal { var, positive: false }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SatResult {
    Sat,
    Unsat,
}

/// A Boolean satisfiability solver.
///
/// `model_value` is only meaningful after `solve` returned `SatResult::Sat` on the same instance.
pub trait SatOracle {
    fn new_var(&mut self) -> VarId;
    fn add_clause(&mut self, literals: &[Literal]);
    fn solve(&mut self) -> Result<SatResult, ProcessingError>;
    fn model_value(&self, var: VarId) -> bool;

    /// Once `flag` is set, a running `solve` may give up with `ProcessingError::Interrupted`.
    /// Oracles that cannot stop early ignore it.
    fn set_interrupt(&mut self, _flag: Arc<AtomicBool>) {}
}

/// Names the available oracle implementations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, clap::ValueEnum)]
pub enum OracleKind {
    #[default]
    Varisat,
    Backtrack,
}

impl OracleKind {
    /// Creates a fresh oracle instance.
    pub fn build(self) -> Box<dyn SatOracle> {
        match self {
            OracleKind::Varisat => Box::new(VarisatOracle::new()),
            OracleKind::Backtrack => Box::new(BacktrackOracle::new()),
        }
    }
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleKind::Varisat => write!(f, "varisat"),
            OracleKind::Backtrack => write!(f, "backtrack"),
        }
    }
}

/// `SatOracle` on top of `varisat::Solver`.
pub struct VarisatOracle {
    solver: varisat::Solver<'static>,
    num_vars: usize,
    model: Vec<bool>,
}

impl VarisatOracle {
    pub fn new() -> Self {
        VarisatOracle {
            solver: varisat::Solver::new(),
            num_vars: 0,
            model: Vec::new(),
        }
    }
}

impl Default for VarisatOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl SatOracle for VarisatOracle {

    fn new_var(&mut self) -> VarId {
        let var = self.solver.new_var();
        self.num_vars = self.num_vars.max(var.index() + 1);
        VarId(var.index())
    }

    fn add_clause(&mut self, literals: &[Literal]) {
        let clause: Vec<varisat::Lit> = literals.iter()
            .map(|lit| {
                let var = varisat::Var::from_index(lit.var.0);
                if lit.positive {
                    var.positive()
                } else {
                    var.negative()
                }
            })
            .collect();
        self.solver.add_clause(&clause);
    }

    fn solve(&mut self) -> Result<SatResult, ProcessingError> {
        self.model.clear();
        let satisfiable = self.solver.solve()
            .map_err(|e| ProcessingError::Oracle(e.to_string()))?;
        if !satisfiable {
            return Ok(SatResult::Unsat)
        }
        let model = self.solver.model()
            .ok_or_else(|| ProcessingError::Oracle("no model after a SAT answer".to_owned()))?;
        self.model = vec![false; self.num_vars];
        for lit in model {
            if lit.index() < self.model.len() {
                self.model[lit.index()] = lit.is_positive();
            }
        }
        Ok(SatResult::Sat)
    }

    fn model_value(&self, var: VarId) -> bool {
        self.model.get(var.0).copied().unwrap_or(false)
    }
}

/// A chronological backtracking solver with unit propagation.
///
/// Branches on the lowest unassigned variable, `true` first, so the model it finds only depends on
/// the clauses and their order. Checks its interrupt flag at every branching step.
#[derive(Debug, Default, Clone)]
pub struct BacktrackOracle {
    num_vars: usize,
    clauses: Vec<Vec<Literal>>,
    model: Vec<bool>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl BacktrackOracle {
    pub fn new() -> Self {
        Self::default()
    }

    fn interrupted(&self) -> bool {
        self.interrupt.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    /// Assigns every literal forced by a clause with a single open literal.
    /// Records each assignment in `trail`. Returns `false` on a falsified clause.
    fn propagate(&self, assignment: &mut [Option<bool>], trail: &mut Vec<usize>) -> bool {
        loop {
            let mut changed = false;
            for clause in &self.clauses {
                let mut open = 0;
                let mut last_open = None;
                let mut satisfied = false;
                for lit in clause {
                    match assignment[lit.var.0] {
                        Some(value) if value == lit.positive => {
                            satisfied = true;
                            break
                        },
                        Some(_) => {},
                        None => {
                            open += 1;
                            last_open = Some(*lit);
                        },
                    }
                }
                if satisfied {
                    continue
                }
                match (open, last_open) {
                    (0, _) => return false,
                    (1, Some(lit)) => {
                        assignment[lit.var.0] = Some(lit.positive);
                        trail.push(lit.var.0);
                        changed = true;
                    },
                    _ => {},
                }
            }
            if !changed {
                return true
            }
        }
    }

    /// Leaves a full satisfying assignment behind on success, undoes its own assignments otherwise.
    fn search(&self, assignment: &mut Vec<Option<bool>>) -> Result<bool, ProcessingError> {
        if self.interrupted() {
            return Err(ProcessingError::Interrupted)
        }
        let mut trail = Vec::new();
        if self.propagate(assignment, &mut trail) {
            match assignment.iter().position(Option::is_none) {
                None => return Ok(true),
                Some(var) => {
                    for value in [true, false] {
                        assignment[var] = Some(value);
                        if self.search(assignment)? {
                            return Ok(true)
                        }
                    }
                    assignment[var] = None;
                },
            }
        }
        for var in trail {
            assignment[var] = None;
        }
        Ok(false)
    }
}

impl SatOracle for BacktrackOracle {

    fn new_var(&mut self) -> VarId {
        self.num_vars += 1;
        VarId(self.num_vars - 1)
    }

    fn add_clause(&mut self, literals: &[Literal]) {
        self.clauses.push(literals.to_vec());
    }

    fn solve(&mut self) -> Result<SatResult, ProcessingError> {
        self.model.clear();
        if let Some(lit) = self.clauses.iter().flatten().find(|lit| lit.var.0 >= self.num_vars) {
            return Err(ProcessingError::Oracle(format!("clause uses unallocated variable {}", lit.var.0)))
        }
        let mut assignment = vec![None; self.num_vars];
        if !self.search(&mut assignment)? {
            return Ok(SatResult::Unsat)
        }
        self.model = assignment.into_iter()
            .map(|value| value.unwrap_or(false))
            .collect();
        Ok(SatResult::Sat)
    }

    fn model_value(&self, var: VarId) -> bool {
        self.model.get(var.0).copied().unwrap_or(false)
    }

    fn set_interrupt(&mut self, flag: Arc<AtomicBool>) {
        self.interrupt = Some(flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pigeonhole(oracle: &mut dyn SatOracle, pigeons: usize, holes: usize) -> Vec<Vec<VarId>> {
        let vars: Vec<Vec<VarId>> = (0..pigeons)
            .map(|_| (0..holes).map(|_| oracle.new_var()).collect())
            .collect();
        for row in &vars {
            let clause: Vec<Literal> = row.iter().copied().map(Literal::positive).collect();
            oracle.add_clause(&clause);
        }
        for hole in 0..holes {
            for p in 0..pigeons {
                for q in (p + 1)..pigeons {
                    oracle.add_clause(&[Literal::negative(vars[p][hole]), Literal::negative(vars[q][hole])]);
                }
            }
        }
        vars
    }

    fn check_simple(kind: OracleKind) {
        let mut oracle = kind.build();
        let a = oracle.new_var();
        let b = oracle.new_var();
        oracle.add_clause(&[Literal::positive(a), Literal::positive(b)]);
        oracle.add_clause(&[Literal::negative(a)]);
        assert_eq!(oracle.solve().unwrap(), SatResult::Sat);
        assert!(!oracle.model_value(a));
        assert!(oracle.model_value(b));

        let mut oracle = kind.build();
        let a = oracle.new_var();
        oracle.add_clause(&[Literal::positive(a)]);
        oracle.add_clause(&[Literal::negative(a)]);
        assert_eq!(oracle.solve().unwrap(), SatResult::Unsat);
    }

    fn check_pigeonhole(kind: OracleKind) {
        let mut oracle = kind.build();
        let vars = pigeonhole(oracle.as_mut(), 3, 3);
        assert_eq!(oracle.solve().unwrap(), SatResult::Sat);
        for row in &vars {
            assert!(row.iter().any(|var| oracle.model_value(*var)));
        }
        let mut oracle = kind.build();
        pigeonhole(oracle.as_mut(), 4, 3);
        assert_eq!(oracle.solve().unwrap(), SatResult::Unsat);
    }

    #[test]
    fn varisat_test() {
        check_simple(OracleKind::Varisat);
        check_pigeonhole(OracleKind::Varisat);
    }

    #[test]
    fn backtrack_test() {
        check_simple(OracleKind::Backtrack);
        check_pigeonhole(OracleKind::Backtrack);
    }

    #[test]
    fn backtrack_edge_cases_test() {
        let mut oracle = BacktrackOracle::new();
        assert_eq!(oracle.solve().unwrap(), SatResult::Sat);
        oracle.add_clause(&[]);
        assert_eq!(oracle.solve().unwrap(), SatResult::Unsat);

        let mut oracle = BacktrackOracle::new();
        oracle.add_clause(&[Literal::positive(VarId(3))]);
        assert!(matches!(oracle.solve(), Err(ProcessingError::Oracle(_))));
    }

    #[test]
    fn backtrack_is_deterministic_test() {
        let mut models = Vec::new();
        for _ in 0..2 {
            let mut oracle = BacktrackOracle::new();
            let vars = pigeonhole(&mut oracle, 2, 3);
            assert_eq!(oracle.solve().unwrap(), SatResult::Sat);
            let model: Vec<bool> = vars.iter().flatten().map(|var| oracle.model_value(*var)).collect();
            models.push(model);
        }
        assert_eq!(models[0], models[1]);
        // Lowest variable first, `true` first: pigeon 0 takes hole 0.
        assert!(models[0][0]);
    }

    #[test]
    fn backtrack_interrupt_test() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut oracle = BacktrackOracle::new();
        oracle.set_interrupt(Arc::clone(&flag));
        pigeonhole(&mut oracle, 3, 3);
        assert_eq!(oracle.solve().unwrap(), SatResult::Sat);
        flag.store(true, Ordering::Relaxed);
        assert!(matches!(oracle.solve(), Err(ProcessingError::Interrupted)));

        // `varisat` runs to completion regardless.
        let mut varisat = VarisatOracle::new();
        varisat.set_interrupt(flag);
        pigeonhole(&mut varisat, 3, 3);
        assert_eq!(varisat.solve().unwrap(), SatResult::Sat);
    }

    #[test]
    fn oracle_kind_test() {
        assert_eq!(OracleKind::default(), OracleKind::Varisat);
        assert_eq!(OracleKind::Backtrack.to_string(), "backtrack");
    }
}
