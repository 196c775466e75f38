//! Implementation of two greedy approximations for the Vertex Cover Problem.
//!
//! Both work on a `Residual` copy of the degrees, so the `UGraph` they are called on is never
//! touched. Selection scans in a fixed order and only replaces the current candidate on a strictly
//! larger value, which makes the first maximum win:
//! * degree-greedy scans vertices by ascending id,
//! * edge-greedy scans the remaining edges in insertion order.

use crate::cover::Cover;
use crate::graph::UGraph;

/// Residual degrees of a graph from which vertices get removed one by one.
struct Residual<'a> {
    graph: &'a UGraph,
    /// `degree[v - 1]` is the number of neighbors of `v` that are still present.
    degree: Vec<usize>,
    removed: Vec<bool>,
    remaining_edges: usize,
}

impl<'a> Residual<'a> {

    fn new(graph: &'a UGraph) -> Self {
        Residual {
            graph,
            degree: graph.nodes()
                .map(|node| graph.degree(node).expect("`node` exists"))
                .collect(),
            removed: vec![false; graph.num_nodes()],
            remaining_edges: graph.num_edges(),
        }
    }

    fn degree(&self, node: usize) -> usize {
        self.degree[node - 1]
    }

    /// Removes `node` and its incident edges.
    /// Returns `false` if `node` was already removed.
    fn remove_node(&mut self, node: usize) -> bool {
        if self.removed[node - 1] {
            return false
        }
        self.removed[node - 1] = true;
        self.remaining_edges -= self.degree[node - 1];
        self.degree[node - 1] = 0;
        for neigh in self.graph.neighbors(node).expect("`node` exists") {
            if !self.removed[*neigh - 1] {
                self.degree[*neigh - 1] -= 1;
            }
        }
        true
    }

    /// Returns the present vertex with the highest residual degree, the lowest id among equals, or
    /// `None` if no edge remains.
    fn max_degree_node(&self) -> Option<usize> {
        let mut best = None;
        let mut best_degree = 0;
        for node in self.graph.nodes() {
            if self.degree(node) > best_degree {
                best = Some(node);
                best_degree = self.degree(node);
            }
        }
        best
    }
}

impl UGraph {

    /// Returns the vertices picked by degree-greedy, in the order they were picked.
    ///
    /// Repeatedly takes the vertex of maximum residual degree (lowest id on ties) and removes it
    /// with its incident edges, until no edge remains.
    pub fn degree_greedy_picks(&self) -> Vec<usize> {
        let mut residual = Residual::new(self);
        let mut picks = Vec::new();
        while residual.remaining_edges > 0 {
            let node = residual.max_degree_node()
                .expect("an edge remains, so some vertex has positive degree");
            tracing::trace!("degree-greedy picks {} (residual degree {})", node, residual.degree(node));
            residual.remove_node(node);
            picks.push(node);
        }
        picks
    }

    /// Approximates the minimum vertex cover by repeatedly adding the vertex with the highest
    /// residual degree.
    pub fn degree_greedy_cover(&self) -> Cover {
        self.degree_greedy_picks().into_iter().collect()
    }

    /// Approximates the minimum vertex cover by repeatedly adding both endpoints of the remaining
    /// edge with the highest residual degree sum, until no edge remains.
    /// The resulting cover is, in the worst case, twice as large as an optimal one.
    pub fn edge_greedy_cover(&self) -> Cover {
        let mut residual = Residual::new(self);
        let mut remaining: Vec<(usize, usize)> = self.edges().to_vec();
        let mut solution = Vec::new();
        while !remaining.is_empty() {
            let mut max_edge = remaining[0];
            let mut max_sum = 0;
            for (src, trg) in &remaining {
                let sum = residual.degree(*src) + residual.degree(*trg);
                if sum > max_sum {
                    max_sum = sum;
                    max_edge = (*src, *trg);
                }
            }
            let (src, trg) = max_edge;
            tracing::trace!("edge-greedy picks <{},{}> (degree sum {})", src, trg, max_sum);
            residual.remove_node(src);
            residual.remove_node(trg);
            solution.push(src);
            solution.push(trg);
            // Order of the survivors decides later ties.
            remaining.retain(|(a, b)| *a != src && *a != trg && *b != src && *b != trg);
        }
        solution.into_iter().collect()
    }
}
