//! Implementation of a simple, undirected graph data structure holding the vertex count and the
//! edge set a cover is computed for.
//!
//! Vertices are identified by `1..=n`. Edges are kept twice: once in the adjacency sets for
//! degree and neighborhood queries and once in insertion order, since the edge-greedy heuristic
//! breaks ties by the position of an edge in that list.

use fxhash::FxHashSet;
use std::io::BufRead;
use crate::cust_error::{GraphError, ImportError};

/// A simple undirected graph without self-loops or parallel edges.
#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct UGraph {
    n: usize,
    /// `adj_list[v - 1]` holds the neighbors of `v`.
    adj_list: Vec<FxHashSet<usize>>,
    edges: Vec<(usize, usize)>,
}

// Static functions
impl UGraph {

    /// Creates a graph with the vertices `1..=n` and no edges.
    pub fn new(n: usize) -> Self {
        UGraph {
            n,
            adj_list: vec![FxHashSet::default(); n],
            edges: Vec::new(),
        }
    }

    /// Returns an `Iterator` over all vertex ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item=usize> {
        1..=self.n
    }

    /// Returns the number of vertices of `self`.
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Returns the number of edges of `self`.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Checks if `node` is a vertex id of `self`.
    pub fn contains_node(&self, node: usize) -> bool {
        node >= 1 && node <= self.n
    }

    /// Returns the neighborhood of `node`, or `None` if `node` is not a vertex of `self`.
    pub fn neighbors(&self, node: usize) -> Option<&FxHashSet<usize>> {
        if self.contains_node(node) {
            Some(&self.adj_list[node - 1])
        } else {
            None
        }
    }

    /// Returns the degree of `node`, or `None` if `node` is not a vertex of `self`.
    pub fn degree(&self, node: usize) -> Option<usize> {
        self.neighbors(node).map(|neighbors| neighbors.len())
    }

    /// Returns all edges in the order they were added.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Checks if `edge` exists, in either orientation.
    pub fn edge_exists(&self, edge: (usize, usize)) -> bool {
        if let Some(neighs) = self.neighbors(edge.0) {
            return neighs.contains(&edge.1)
        }
        false
    }

    /// Checks if `self` holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// Dynamic functions
impl UGraph {

    /// Adds the undirected edge `{src, trg}`.
    ///
    /// Fails with `GraphError::OutOfRange` if either endpoint is not a vertex or `src == trg`, and
    /// with `GraphError::DuplicateEdge` if the edge already exists. Neither changes `self`.
    pub fn add_edge(&mut self, src: usize, trg: usize) -> Result<(), GraphError> {
        if !self.contains_node(src) || !self.contains_node(trg) || src == trg {
            return Err(GraphError::OutOfRange { src, trg, n: self.n })
        }
        if self.edge_exists((src, trg)) {
            return Err(GraphError::DuplicateEdge { src, trg })
        }
        self.adj_list[src - 1].insert(trg);
        self.adj_list[trg - 1].insert(src);
        self.edges.push((src, trg));
        Ok(())
    }

    /// Adds all `edges`, skipping the rejected ones.
    /// Returns the rejections in input order.
    pub fn add_edges<I>(&mut self, edges: I) -> Vec<GraphError>
    where
        I: IntoIterator<Item=(usize, usize)>,
    {
        edges.into_iter()
            .filter_map(|(src, trg)| self.add_edge(src, trg).err())
            .collect()
    }
}

impl UGraph {

    /// Reads a `.gr` input and creates a `UGraph`.
    ///
    /// The header is `p td <n> <m>` (`p vc <n> <m>` is accepted as well), followed by exactly `m`
    /// lines `<src> <trg>`. Empty lines and lines starting with `c ` are ignored.
    pub fn read_gr<R: BufRead>(gr: R) -> Result<Self, ImportError> {
        let mut lines = gr.lines()
            .filter(|l| {
                if let Ok(line) = l {
                    !line.starts_with("c ") && !line.trim().is_empty()
                } else {
                    true
                }
            });
        // p td <n> <m>
        let (n, m) = {
            let line = lines.next()
                .ok_or_else(|| ImportError::InputMalformedError("missing header".to_owned()))??;
            let mut s = line.split_whitespace();
            if let Some("p") = s.next() {} else {
                return Err(ImportError::InputMalformedError(format!("bad header `{}`", line)));
            }
            match s.next() {
                Some("td") | Some("vc") => {},
                _ => return Err(ImportError::InputMalformedError(format!("bad header `{}`", line))),
            }
            let n: usize = s.next()
                .ok_or_else(|| ImportError::InputMalformedError("missing vertex count".to_owned()))?
                .parse()?;
            let m: usize = s.next()
                .ok_or_else(|| ImportError::InputMalformedError("missing edge count".to_owned()))?
                .parse()?;
            if s.next().is_some() {
                return Err(ImportError::InputMalformedError(format!("bad header `{}`", line)));
            }
            (n, m)
        };
        let mut graph = UGraph::new(n);
        let mut num_edges = 0;
        for line in lines {
            // <src> <trg>
            let line = line?;
            let mut s = line.split_whitespace();
            let src = s.next()
                .ok_or_else(|| ImportError::InputMalformedError(line.clone()))?
                .parse::<usize>()?;
            let trg = s.next()
                .ok_or_else(|| ImportError::InputMalformedError(line.clone()))?
                .parse::<usize>()?;
            if s.next().is_some() {
                return Err(ImportError::InputMalformedError(line));
            }
            match graph.add_edge(src, trg) {
                Ok(()) => {},
                Err(GraphError::DuplicateEdge { .. }) => {
                    tracing::warn!("Duplicate edge <{},{}> in .gr input", src, trg);
                },
                Err(e) => return Err(ImportError::InputMalformedError(e.to_string())),
            }
            num_edges += 1;
        }
        if num_edges != m {
            return Err(ImportError::InputMalformedError(
                format!("header announces {} edges, found {}", m, num_edges)));
        }
        Ok(graph)
    }
}
