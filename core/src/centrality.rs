use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::dijkstra::single_source;
use crate::error::{GraphError, Result};
use crate::graph::GraphStore;

/// Which shortest paths a `(source, dest)` pair contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contribution {
    /// Interior nodes of one reconstructed shortest path.
    SinglePath,
    /// Every interior node lying on any tied shortest path, once per pair.
    AllPaths,
}

/// Betweenness over every ordered pair of nodes.
///
/// For each pair `(s, d)` with `s != d` and no direct edge `s -> d`, the
/// interior nodes of one shortest path are counted. Unreachable pairs
/// contribute nothing. Only nodes with a non-zero count appear in the map.
pub fn betweenness_centrality<G>(graph: &G) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    betweenness_centrality_with_config(graph, &EngineConfig::default())
}

pub fn betweenness_centrality_with_config<G>(
    graph: &G,
    config: &EngineConfig,
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    let nodes: Vec<G::Node> = graph.nodes().cloned().collect();
    aggregate(graph, &nodes, Contribution::SinglePath, config)
}

/// Betweenness restricted to pairs drawn from `subset`. Interior nodes
/// outside the subset are still counted.
pub fn betweenness_centrality_subset<G>(
    graph: &G,
    subset: &[G::Node],
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    betweenness_centrality_subset_with_config(graph, subset, &EngineConfig::default())
}

pub fn betweenness_centrality_subset_with_config<G>(
    graph: &G,
    subset: &[G::Node],
    config: &EngineConfig,
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    let subset = checked_subset(graph, subset)?;
    aggregate(graph, &subset, Contribution::SinglePath, config)
}

/// Like [`betweenness_centrality`], but a node is counted for a pair when it
/// lies on any of the pair's shortest paths.
pub fn all_shortest_paths_betweenness_centrality<G>(graph: &G) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    all_shortest_paths_betweenness_centrality_with_config(graph, &EngineConfig::default())
}

pub fn all_shortest_paths_betweenness_centrality_with_config<G>(
    graph: &G,
    config: &EngineConfig,
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    let nodes: Vec<G::Node> = graph.nodes().cloned().collect();
    aggregate(graph, &nodes, Contribution::AllPaths, config)
}

pub fn all_shortest_paths_betweenness_centrality_subset<G>(
    graph: &G,
    subset: &[G::Node],
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    all_shortest_paths_betweenness_centrality_subset_with_config(
        graph,
        subset,
        &EngineConfig::default(),
    )
}

pub fn all_shortest_paths_betweenness_centrality_subset_with_config<G>(
    graph: &G,
    subset: &[G::Node],
    config: &EngineConfig,
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    let subset = checked_subset(graph, subset)?;
    aggregate(graph, &subset, Contribution::AllPaths, config)
}

/// Reject unknown nodes and drop repeats, keeping first-seen order.
fn checked_subset<G: GraphStore>(graph: &G, subset: &[G::Node]) -> Result<Vec<G::Node>> {
    let mut seen = HashSet::with_capacity(subset.len());
    let mut out = Vec::with_capacity(subset.len());
    for node in subset {
        if !graph.has_node(node) {
            return Err(GraphError::node_not_found(node));
        }
        if seen.insert(node) {
            out.push(node.clone());
        }
    }
    Ok(out)
}

/// Fork-join over sources: one relaxation per source on the pool, counters
/// shared as atomics indexed by node position. The first failing source
/// aborts the whole run.
#[tracing::instrument(level = "debug", skip_all, fields(sources = sources.len(), mode = ?mode))]
fn aggregate<G>(
    graph: &G,
    sources: &[G::Node],
    mode: Contribution,
    config: &EngineConfig,
) -> Result<HashMap<G::Node, usize>>
where
    G: GraphStore + Sync,
    G::Node: Send + Sync,
{
    let index: HashMap<&G::Node, usize> = graph.nodes().enumerate().map(|(i, n)| (n, i)).collect();
    let counters: Vec<AtomicUsize> = (0..index.len()).map(|_| AtomicUsize::new(0)).collect();

    let run = || {
        sources
            .par_iter()
            .try_for_each(|source| accumulate(graph, source, sources, mode, &index, &counters))
    };
    let pool = config.thread_pool()?;
    match &pool {
        Some(pool) => pool.install(run)?,
        None => run()?,
    }

    let scores: HashMap<G::Node, usize> = index
        .iter()
        .filter_map(|(node, &i)| {
            let count = counters[i].load(Ordering::Relaxed);
            (count > 0).then(|| ((*node).clone(), count))
        })
        .collect();

    tracing::debug!(
        threads = pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |p| p.current_num_threads()),
        scored = scores.len(),
        "betweenness aggregated"
    );
    Ok(scores)
}

fn accumulate<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dests: &[G::Node],
    mode: Contribution,
    index: &HashMap<&G::Node, usize>,
    counters: &[AtomicUsize],
) -> Result<()> {
    let bump = |node: &G::Node| {
        if let Some(&i) = index.get(node) {
            counters[i].fetch_add(1, Ordering::Relaxed);
        }
    };

    let tree = single_source(graph, source, mode == Contribution::AllPaths, &HashSet::new())?;
    for dest in dests {
        if dest == source || graph.has_edge(source, dest) {
            continue;
        }
        match mode {
            Contribution::SinglePath => {
                if let Some(path) = tree.path_to(dest) {
                    path.interior().iter().for_each(&bump);
                }
            }
            Contribution::AllPaths => {
                if let Some(nodes) = tree.nodes_on_shortest_paths(dest) {
                    nodes
                        .iter()
                        .filter(|n| *n != source && *n != dest)
                        .for_each(&bump);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{chain_graph, fan_graph, no_path_graph, wikipedia_graph};
    use crate::graph::Graph;

    fn scores(pairs: &[(u32, usize)]) -> HashMap<u32, usize> {
        pairs.iter().copied().collect()
    }

    fn square() -> Graph<u32, u32> {
        Graph::from_edges(false, vec![(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]).unwrap()
    }

    fn star(leaves: u32) -> Graph<u32, u32> {
        Graph::from_edges(false, (1..=leaves).map(|leaf| (0, leaf, 1))).unwrap()
    }

    // --- Single shortest path tests ---

    #[test]
    fn test_betweenness_chain() {
        let result = betweenness_centrality(&chain_graph(5)).unwrap();
        assert_eq!(result, scores(&[(1, 6), (2, 8), (3, 6)]));
    }

    #[test]
    fn test_betweenness_star() {
        let result = betweenness_centrality(&star(4)).unwrap();
        assert_eq!(result, scores(&[(0, 12)]));
    }

    #[test]
    fn test_betweenness_square_counts_one_path_per_pair() {
        let result = betweenness_centrality(&square()).unwrap();
        // Four non-adjacent ordered pairs, one interior node each
        assert_eq!(result.values().sum::<usize>(), 4);
    }

    #[test]
    fn test_betweenness_skips_unreachable_pairs() {
        let result = betweenness_centrality(&no_path_graph()).unwrap();
        assert_eq!(result, scores(&[(1, 2)]));
    }

    #[test]
    fn test_betweenness_directed_fan() {
        let result = betweenness_centrality(&fan_graph(3)).unwrap();
        assert_eq!(result.values().sum::<usize>(), 1);
        assert!(result.keys().all(|n| (2..5).contains(n)));
    }

    #[test]
    fn test_betweenness_wikipedia_bounded_by_all_paths() {
        let g = wikipedia_graph();
        let single = betweenness_centrality(&g).unwrap();
        let all = all_shortest_paths_betweenness_centrality(&g).unwrap();
        for (node, count) in &single {
            assert!(*count <= all[node]);
        }
    }

    #[test]
    fn test_betweenness_empty_graph() {
        let g: Graph<u32, u32> = Graph::new_undirected();
        assert!(betweenness_centrality(&g).unwrap().is_empty());
    }

    // --- Subset tests ---

    #[test]
    fn test_betweenness_subset_counts_outside_nodes() {
        let g = chain_graph(5);
        let result = betweenness_centrality_subset(&g, &[0, 4]).unwrap();
        assert_eq!(result, scores(&[(1, 2), (2, 2), (3, 2)]));
    }

    #[test]
    fn test_betweenness_subset_ignores_repeats() {
        let g = chain_graph(5);
        let result = betweenness_centrality_subset(&g, &[0, 4, 0, 4]).unwrap();
        assert_eq!(result, scores(&[(1, 2), (2, 2), (3, 2)]));
    }

    #[test]
    fn test_betweenness_subset_unknown_node() {
        let g = chain_graph(5);
        let err = betweenness_centrality_subset(&g, &[0, 99]).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { .. }));
    }

    // --- All shortest paths tests ---

    #[test]
    fn test_all_paths_betweenness_square() {
        let result = all_shortest_paths_betweenness_centrality(&square()).unwrap();
        assert_eq!(result, scores(&[(0, 2), (1, 2), (2, 2), (3, 2)]));
    }

    #[test]
    fn test_all_paths_betweenness_wikipedia() {
        let result = all_shortest_paths_betweenness_centrality(&wikipedia_graph()).unwrap();
        assert_eq!(result, scores(&[(3, 10), (6, 6), (4, 2)]));
    }

    #[test]
    fn test_all_paths_betweenness_fan() {
        let result = all_shortest_paths_betweenness_centrality(&fan_graph(3)).unwrap();
        assert_eq!(result, scores(&[(2, 1), (3, 1), (4, 1)]));
    }

    #[test]
    fn test_all_paths_betweenness_matches_single_on_trees() {
        let g = chain_graph(6);
        assert_eq!(
            all_shortest_paths_betweenness_centrality(&g).unwrap(),
            betweenness_centrality(&g).unwrap()
        );
    }

    #[test]
    fn test_all_paths_betweenness_subset() {
        let g = square();
        let result = all_shortest_paths_betweenness_centrality_subset(&g, &[0, 2]).unwrap();
        assert_eq!(result, scores(&[(1, 2), (3, 2)]));
    }

    // --- Failure and configuration tests ---

    #[test]
    fn test_betweenness_negative_weight_aborts() {
        let g = Graph::from_edges(false, vec![(1u32, 2u32, 3i32), (2, 3, -1), (3, 4, 2)]).unwrap();
        let err = betweenness_centrality(&g).unwrap_err();
        assert!(matches!(err, GraphError::NegativeWeight { .. }));
        let err = all_shortest_paths_betweenness_centrality(&g).unwrap_err();
        assert!(matches!(err, GraphError::NegativeWeight { .. }));
    }

    #[test]
    fn test_betweenness_thread_counts_agree() {
        let g = wikipedia_graph();
        let one = EngineConfig {
            centrality_threads: 1,
            ..EngineConfig::default()
        };
        let four = EngineConfig {
            centrality_threads: 4,
            ..EngineConfig::default()
        };
        assert_eq!(
            all_shortest_paths_betweenness_centrality_with_config(&g, &one).unwrap(),
            all_shortest_paths_betweenness_centrality_with_config(&g, &four).unwrap()
        );
    }

    #[test]
    fn test_betweenness_global_pool_matches_dedicated() {
        let g = wikipedia_graph();
        let two = EngineConfig {
            centrality_threads: 2,
            ..EngineConfig::default()
        };
        assert_eq!(
            all_shortest_paths_betweenness_centrality_with_config(&g, &EngineConfig::default())
                .unwrap(),
            all_shortest_paths_betweenness_centrality_with_config(&g, &two).unwrap()
        );
        assert_eq!(
            betweenness_centrality_with_config(&chain_graph(4), &EngineConfig::default()).unwrap(),
            betweenness_centrality_with_config(&chain_graph(4), &two).unwrap()
        );
    }

    #[test]
    fn test_betweenness_invalid_config() {
        let config = EngineConfig {
            centrality_threads: 100_000,
            ..EngineConfig::default()
        };
        let err = betweenness_centrality_with_config(&chain_graph(3), &config).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig(_)));
    }
}
