//! Random graphs for experiments comparing the exact and the greedy covers.

use rand::seq::SliceRandom;
use rand::Rng;
use crate::graph::UGraph;

/// Returns a graph on `1..=n` with `m` distinct edges drawn uniformly at random.
/// `m` is clamped to `n(n-1)/2`.
pub fn random_graph<R: Rng>(n: usize, m: usize, rng: &mut R) -> UGraph {
    let pairs: Vec<(usize, usize)> = (1..=n)
        .flat_map(|src| ((src + 1)..=n).map(move |trg| (src, trg)))
        .collect();
    let m = m.min(pairs.len());
    let mut graph = UGraph::new(n);
    for (src, trg) in pairs.choose_multiple(rng, m) {
        // Random orientation as well.
        let added = if rng.gen_bool(0.5) {
            graph.add_edge(*src, *trg)
        } else {
            graph.add_edge(*trg, *src)
        };
        debug_assert!(added.is_ok());
    }
    graph
}
