//! This module contains all custom errors used in this library.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import: IoError: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Import: Input is malformed: {0}")]
    InputMalformedError(String),
    #[error("Import: Integer is malformed.")]
    BadIntError(#[from] std::num::ParseIntError),
}

/// Rejected graph edits. None of these abort a session, the offending edge is dropped.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum GraphError {
    /// An endpoint lies outside `[1, n]`, or both endpoints are the same vertex.
    #[error("Edge <{src},{trg}> is out of range for a graph with {n} vertices")]
    OutOfRange { src: usize, trg: usize, n: usize },
    #[error("Edge <{src},{trg}> already exists")]
    DuplicateEdge { src: usize, trg: usize },
    #[error("No graph declared yet, use `V <n>` first")]
    NoGraph,
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("SAT oracle failed: {0}")]
    Oracle(String),
    /// A solver worker terminated without reporting a result.
    #[error("Solver worker exited without a result")]
    WorkerLost,
    #[error("SAT oracle interrupted")]
    Interrupted,
    #[error("InvalidSolution: {0}")]
    InvalidSolution(String),
    #[error("Processing: IoError: {0}")]
    IoError(#[from] std::io::Error),
}
