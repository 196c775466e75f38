use proptest::prelude::*;
use sat_cover::cover::Cover;
use sat_cover::exact_search::{AttemptOutcome, MinimumCoverSearch};
use sat_cover::graph::UGraph;
use sat_cover::oracle::OracleKind;

fn arb_graph() -> impl Strategy<Value = UGraph> {
    (1usize..=7)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((1..=n, 1..=n), 0..18)))
        .prop_map(|(n, pairs)| {
            let mut graph = UGraph::new(n);
            // Self-loops and repeated pairs are rejected and simply skipped.
            graph.add_edges(pairs);
            graph
        })
}

/// Size of a minimum cover by trying every vertex subset.
fn brute_force_minimum(graph: &UGraph) -> usize {
    let n = graph.num_nodes();
    (0u32..(1 << n))
        .filter(|mask| {
            let in_mask = |node: usize| *mask & (1u32 << (node - 1)) != 0;
            graph.edges()
                .iter()
                .all(|(src, trg)| in_mask(*src) || in_mask(*trg))
        })
        .map(|mask| mask.count_ones() as usize)
        .min()
        .expect("the full vertex set is a cover")
}

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn every_cover_is_valid(graph in arb_graph()) {
        let search = MinimumCoverSearch::new(OracleKind::Varisat, None);
        let exact = search.minimum_cover(&graph).unwrap();
        prop_assert!(exact.optimal);
        prop_assert!(exact.cover.is_cover_of(&graph));
        prop_assert!(graph.degree_greedy_cover().is_cover_of(&graph));
        prop_assert!(graph.edge_greedy_cover().is_cover_of(&graph));
    }

    #[test]
    fn exact_is_minimum_and_dominates_greedy(graph in arb_graph()) {
        let minimum = brute_force_minimum(&graph);
        for kind in [OracleKind::Varisat, OracleKind::Backtrack] {
            let exact = MinimumCoverSearch::new(kind, None).minimum_cover(&graph).unwrap().cover;
            prop_assert_eq!(exact.len(), minimum);
            prop_assert!(exact.len() <= graph.degree_greedy_cover().len());
            prop_assert!(exact.len() <= graph.edge_greedy_cover().len());
        }
    }

    #[test]
    fn encoding_flips_at_minimum(graph in arb_graph()) {
        let minimum = brute_force_minimum(&graph);
        let search = MinimumCoverSearch::new(OracleKind::Varisat, None);
        match search.attempt(&graph, minimum).unwrap() {
            AttemptOutcome::Satisfiable(cover) => {
                prop_assert_eq!(cover.len(), minimum);
                prop_assert!(cover.is_cover_of(&graph));
            },
            other => prop_assert!(false, "expected SAT at k = {}, got {:?}", minimum, other),
        }
        if minimum > 0 {
            prop_assert_eq!(search.attempt(&graph, minimum - 1).unwrap(), AttemptOutcome::Unsatisfiable);
        }
    }

    #[test]
    fn degree_greedy_starts_with_lowest_max_degree_vertex(graph in arb_graph()) {
        let picks = graph.degree_greedy_picks();
        let max_degree = graph.nodes().map(|node| graph.degree(node).unwrap()).max().unwrap();
        if max_degree == 0 {
            prop_assert!(picks.is_empty());
        } else {
            let expected = graph.nodes().find(|node| graph.degree(*node) == Some(max_degree));
            prop_assert_eq!(picks.first().copied(), expected);
            let cover: Cover = picks.iter().copied().collect();
            prop_assert_eq!(cover.len(), picks.len());
        }
    }

    #[test]
    fn backtrack_search_is_repeatable(graph in arb_graph()) {
        let search = MinimumCoverSearch::new(OracleKind::Backtrack, None);
        let first = search.minimum_cover(&graph).unwrap();
        let second = search.minimum_cover(&graph).unwrap();
        prop_assert_eq!(first.cover, second.cover);
    }
}
