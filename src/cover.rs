//! The `Cover` type shared by all algorithms.

use std::fmt;
use crate::graph::UGraph;

/// A set of vertex ids, kept sorted ascending and free of duplicates.
#[derive(Debug, Eq, PartialEq, Clone, Default, Hash)]
pub struct Cover {
    vertices: Vec<usize>,
}

impl Cover {

    /// Returns the empty cover.
    pub fn empty() -> Self {
        Cover::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.vertices.binary_search(&node).is_ok()
    }

    /// Returns the vertices in ascending order.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn iter(&self) -> impl Iterator<Item=usize> + '_ {
        self.vertices.iter().copied()
    }

    /// Checks whether every edge of `graph` has at least one endpoint in `self` and every vertex of
    /// `self` belongs to `graph`.
    pub fn is_cover_of(&self, graph: &UGraph) -> bool {
        if self.iter().any(|node| !graph.contains_node(node)) {
            return false
        }
        graph.edges()
            .iter()
            .all(|(src, trg)| self.contains(*src) || self.contains(*trg))
    }

    /// Returns the first edge of `graph` that `self` leaves uncovered.
    pub fn uncovered_edge(&self, graph: &UGraph) -> Option<(usize, usize)> {
        graph.edges()
            .iter()
            .find(|(src, trg)| !self.contains(*src) && !self.contains(*trg))
            .copied()
    }
}

impl FromIterator<usize> for Cover {
    fn from_iter<I: IntoIterator<Item=usize>>(iter: I) -> Self {
        let mut vertices: Vec<usize> = iter.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();
        Cover { vertices }
    }
}

/// Renders as `v1 v2 ... (size)`, an empty cover as `(0)`.
impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.vertices {
            write!(f, "{} ", node)?;
        }
        write!(f, "({})", self.vertices.len())
    }
}
