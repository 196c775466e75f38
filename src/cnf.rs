//! CNF encoding of "the graph has a vertex cover of exactly `k` vertices".
//!
//! The encoding uses one variable `x[i][j]` per cover position `i` in `0..k` and vertex index `j`
//! in `0..n` (vertex id `j + 1`), meaning "position `i` holds vertex `j + 1`". Its clauses are
//! grouped in four families:
//! 1. every position holds at least one vertex,
//! 2. no vertex occupies two positions,
//! 3. no position holds two vertices,
//! 4. every edge has an endpoint in some position.
//!
//! Families 1 to 3 make the positions name `k` distinct vertices, family 4 makes them a cover.
//! Families 2 and 3 contribute `n * k(k-1)/2` and `k * n(n-1)/2` binary clauses, which dominates
//! the size of the formula.

use std::io::{self, Write};
use crate::cover::Cover;
use crate::graph::UGraph;
use crate::oracle::{Literal, SatOracle, VarId};

/// A literal over the position-vertex variables of one `ClauseSet`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PositionLit {
    pub position: usize,
    /// Zero-based vertex index.
    pub vertex: usize,
    pub positive: bool,
}

/// The clauses for one value of `k`. Built fresh per attempt and consumed by a single oracle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClauseSet {
    n: usize,
    k: usize,
    clauses: Vec<Vec<PositionLit>>,
}

impl ClauseSet {

    /// Encodes the existence of a vertex cover of size exactly `k` in `graph`.
    pub fn encode(graph: &UGraph, k: usize) -> Self {
        Self::encode_edges(graph.num_nodes(), k, graph.edges())
    }

    /// Encodes the existence of a vertex cover of size exactly `k` of the graph on `1..=n` with the
    /// given `edges`. Every endpoint must lie in `1..=n`.
    pub fn encode_edges(n: usize, k: usize, edges: &[(usize, usize)]) -> Self {
        let x = |position: usize, vertex: usize, positive: bool| PositionLit { position, vertex, positive };
        let pairs = |count: usize| count * count.saturating_sub(1) / 2;
        let mut clauses = Vec::with_capacity(k + n * pairs(k) + k * pairs(n) + edges.len());

        // Family 1
        for i in 0..k {
            clauses.push((0..n).map(|j| x(i, j, true)).collect());
        }
        // Family 2
        for m in 0..n {
            for q in 0..k {
                for p in (q + 1)..k {
                    clauses.push(vec![x(p, m, false), x(q, m, false)]);
                }
            }
        }
        // Family 3
        for m in 0..k {
            for p in 0..n {
                for q in (p + 1)..n {
                    clauses.push(vec![x(m, p, false), x(m, q, false)]);
                }
            }
        }
        // Family 4
        for (src, trg) in edges {
            let clause = (0..k)
                .flat_map(|i| [x(i, src - 1, true), x(i, trg - 1, true)])
                .collect();
            clauses.push(clause);
        }
        ClauseSet { n, k, clauses }
    }

    pub fn num_vars(&self) -> usize {
        self.n * self.k
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Vec<PositionLit>] {
        &self.clauses
    }

    /// Position of `x[position][vertex]` among the variables, row by row.
    fn var_index(&self, position: usize, vertex: usize) -> usize {
        position * self.n + vertex
    }

    /// Allocates fresh variables in `oracle` and adds all clauses.
    /// Returns the allocated variables, indexed by `position * n + vertex`.
    pub fn load_into(&self, oracle: &mut dyn SatOracle) -> Vec<VarId> {
        let vars: Vec<VarId> = (0..self.num_vars()).map(|_| oracle.new_var()).collect();
        let mut buffer = Vec::new();
        for clause in &self.clauses {
            buffer.clear();
            buffer.extend(clause.iter().map(|lit| Literal {
                var: vars[self.var_index(lit.position, lit.vertex)],
                positive: lit.positive,
            }));
            oracle.add_clause(&buffer);
        }
        vars
    }

    /// Reads the cover off a satisfying model: every vertex that occupies some position.
    pub fn decode(&self, oracle: &dyn SatOracle, vars: &[VarId]) -> Cover {
        (0..self.k)
            .flat_map(|i| (0..self.n).map(move |j| (i, j)))
            .filter(|(i, j)| oracle.model_value(vars[self.var_index(*i, *j)]))
            .map(|(_, j)| j + 1)
            .collect()
    }

    /// Writes the clauses in DIMACS CNF format, `x[i][j]` numbered `i * n + j + 1`.
    pub fn write_dimacs<W: Write>(&self, mut out: W) -> Result<(), io::Error> {
        writeln!(out, "p cnf {} {}", self.num_vars(), self.num_clauses())?;
        for clause in &self.clauses {
            for lit in clause {
                let number = self.var_index(lit.position, lit.vertex) + 1;
                if lit.positive {
                    write!(out, "{} ", number)?;
                } else {
                    write!(out, "-{} ", number)?;
                }
            }
            writeln!(out, "0")?;
        }
        Ok(())
    }
}
