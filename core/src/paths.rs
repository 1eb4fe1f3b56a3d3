use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use num_traits::Zero;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::EngineConfig;
use crate::dijkstra::{single_pair, ShortestPathTree};
use crate::error::Result;
use crate::graph::GraphStore;
use crate::weight::Weight;

/// A node sequence from source to destination and its total weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<N, W> {
    pub nodes: Vec<N>,
    pub weight: W,
}

impl<N, W> Path<N, W> {
    pub fn source(&self) -> Option<&N> {
        self.nodes.first()
    }

    pub fn destination(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// Number of edges on the path.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Nodes strictly between source and destination.
    pub fn interior(&self) -> &[N] {
        if self.nodes.len() < 2 {
            return &[];
        }
        &self.nodes[1..self.nodes.len() - 1]
    }
}

impl<N, W> ShortestPathTree<N, W>
where
    N: Clone + Eq + Hash,
    W: Weight,
{
    /// Follow the first predecessor of each node from `dest` back to the
    /// source. `None` if `dest` was never settled.
    pub fn path_to(&self, dest: &N) -> Option<Path<N, W>> {
        let weight = self.distance(dest)?;
        let mut nodes = vec![dest.clone()];
        let mut current = dest;
        while let Some(next) = self.predecessors_of(current).first() {
            nodes.push(next.clone());
            current = next;
        }
        nodes.reverse();
        Some(Path { nodes, weight })
    }

    /// Every node reachable backwards from `dest` over all recorded
    /// predecessors, `dest` and the source included. With tie recording this
    /// is exactly the set of nodes lying on some shortest path to `dest`.
    pub fn nodes_on_shortest_paths(&self, dest: &N) -> Option<HashSet<N>> {
        self.distance(dest)?;
        let mut visited: HashSet<N> = HashSet::new();
        let mut queue: VecDeque<&N> = VecDeque::new();
        queue.push_back(dest);

        while let Some(v) = queue.pop_front() {
            if !visited.insert(v.clone()) {
                continue;
            }
            queue.extend(self.predecessors_of(v));
        }
        Some(visited)
    }
}

/// Shortest path between two nodes, `Ok(None)` when unreachable.
pub fn shortest_path<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
) -> Result<Option<Path<G::Node, G::Weight>>> {
    shortest_path_excluding(graph, source, dest, &HashSet::new())
}

/// Shortest path that never passes through any of `excluded`.
pub fn shortest_path_excluding<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
    excluded: &HashSet<G::Node>,
) -> Result<Option<Path<G::Node, G::Weight>>> {
    let tree = single_pair(graph, source, dest, false, excluded)?;
    Ok(tree.and_then(|t| t.path_to(dest)))
}

/// Relaxation run that records every tying predecessor, stopped at `dest`.
pub fn all_shortest_paths_map<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
) -> Result<Option<ShortestPathTree<G::Node, G::Weight>>> {
    single_pair(graph, source, dest, true, &HashSet::new())
}

/// Nodes lying on at least one shortest `source` -> `dest` path (endpoints
/// included) together with the shared shortest distance.
pub fn all_shortest_path_nodes<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
) -> Result<Option<(HashSet<G::Node>, G::Weight)>> {
    let Some(tree) = all_shortest_paths_map(graph, source, dest)? else {
        return Ok(None);
    };
    Ok(tree
        .nodes_on_shortest_paths(dest)
        .zip(tree.distance(dest)))
}

/// Shortest paths between two nodes that consume the tied predecessor
/// relation destructively, one predecessor per node per step.
///
/// Iteration stops as soon as some node on the walk back has no predecessor
/// left. The number of paths produced is therefore a lower bound, not a
/// guaranteed count of vertex-disjoint paths.
pub fn disjoint_shortest_paths<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
) -> Result<DisjointShortestPaths<G::Node, G::Weight>> {
    let Some(tree) = all_shortest_paths_map(graph, source, dest)? else {
        return Ok(DisjointShortestPaths::empty());
    };
    let distance = tree.distance(dest).unwrap_or_else(G::Weight::zero);
    let trivial = tree.source() == dest;
    let predecessors = tree
        .into_predecessors()
        .into_iter()
        .map(|(node, preds)| (node, VecDeque::from(preds)))
        .collect();

    Ok(DisjointShortestPaths {
        dest: Some(dest.clone()),
        predecessors,
        distance,
        trivial,
        current: None,
    })
}

/// Stateful generator returned by [`disjoint_shortest_paths`].
#[derive(Debug, Clone)]
pub struct DisjointShortestPaths<N, W> {
    dest: Option<N>,
    predecessors: HashMap<N, VecDeque<N>>,
    distance: W,
    trivial: bool,
    current: Option<Path<N, W>>,
}

impl<N, W> DisjointShortestPaths<N, W>
where
    N: Clone + Eq + Hash,
    W: Weight,
{
    fn empty() -> Self {
        Self {
            dest: None,
            predecessors: HashMap::new(),
            distance: W::zero(),
            trivial: false,
            current: None,
        }
    }

    /// Randomize every predecessor list so successive runs may surface
    /// different paths. Call before the first `advance`.
    pub fn shuffle(&mut self) -> &mut Self {
        self.shuffle_with(&mut rand::rng())
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        for preds in self.predecessors.values_mut() {
            preds.make_contiguous().shuffle(rng);
        }
        self
    }

    /// Shuffle with the configured seed, or OS entropy when none is set.
    pub fn shuffle_with_config(&mut self, config: &EngineConfig) -> &mut Self {
        self.shuffle_with(&mut config.rng())
    }

    /// Produce the next path. Returns false once the relation is exhausted;
    /// from then on every call returns false.
    pub fn advance(&mut self) -> bool {
        let Some(dest) = self.dest.clone() else {
            self.current = None;
            return false;
        };

        if self.trivial {
            self.dest = None;
            self.current = Some(Path {
                nodes: vec![dest],
                weight: W::zero(),
            });
            return true;
        }

        let mut nodes = vec![dest.clone()];
        let mut v = dest;
        while let Some(preds) = self.predecessors.get_mut(&v) {
            match preds.pop_front() {
                Some(next) => {
                    nodes.push(next.clone());
                    v = next;
                }
                None => {
                    tracing::trace!(found = nodes.len(), "predecessor branches exhausted");
                    self.exhaust();
                    return false;
                }
            }
        }

        nodes.reverse();
        self.current = Some(Path {
            nodes,
            weight: self.distance,
        });
        true
    }

    /// Path produced by the last successful `advance`.
    pub fn current(&self) -> Option<&Path<N, W>> {
        self.current.as_ref()
    }

    /// Shared weight of every produced path.
    pub fn distance(&self) -> W {
        self.distance
    }

    fn exhaust(&mut self) {
        self.dest = None;
        self.predecessors.clear();
        self.current = None;
    }
}

impl<N, W> Iterator for DisjointShortestPaths<N, W>
where
    N: Clone + Eq + Hash,
    W: Weight,
{
    type Item = Path<N, W>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            self.current.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        chain_graph, fan_graph, hackerrank_graph, multi_path_graph, no_path_graph,
        wikipedia_graph,
    };
    use crate::graph::Graph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // --- Single path tests ---

    #[test]
    fn test_shortest_path_wikipedia() {
        let g = wikipedia_graph();
        let path = shortest_path(&g, &1, &5).unwrap().unwrap();
        assert_eq!(path.weight, 20);
        assert_eq!(path.nodes, vec![1, 3, 6, 5]);
        assert_eq!(g.path_weight(&path.nodes), Some(path.weight));
    }

    #[test]
    fn test_shortest_path_hackerrank() {
        let g = hackerrank_graph();
        let weights: Vec<u32> = [2, 3, 4]
            .iter()
            .map(|d| shortest_path(&g, &1, d).unwrap().unwrap().weight)
            .collect();
        assert_eq!(weights, vec![24, 3, 15]);
    }

    #[test]
    fn test_shortest_path_no_path() {
        let g = no_path_graph();
        assert!(shortest_path(&g, &1, &5).unwrap().is_none());
    }

    #[test]
    fn test_shortest_path_self() {
        let g = wikipedia_graph();
        let path = shortest_path(&g, &4, &4).unwrap().unwrap();
        assert_eq!(path.nodes, vec![4]);
        assert_eq!(path.weight, 0);
        assert_eq!(path.hops(), 0);
        assert!(path.interior().is_empty());
    }

    #[test]
    fn test_shortest_path_unknown_node() {
        let g = wikipedia_graph();
        assert!(shortest_path(&g, &1, &77).is_err());
        assert!(shortest_path(&g, &77, &1).is_err());
    }

    #[test]
    fn test_shortest_path_excluding() {
        let g = wikipedia_graph();
        let excluded: HashSet<u32> = [6].into_iter().collect();
        let path = shortest_path_excluding(&g, &1, &5, &excluded).unwrap().unwrap();
        assert_eq!(path.nodes, vec![1, 3, 4, 5]);
        assert_eq!(path.weight, 26);
    }

    #[test]
    fn test_shortest_path_chain() {
        let g = chain_graph(6);
        let path = shortest_path(&g, &0, &5).unwrap().unwrap();
        assert_eq!(path.nodes, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(path.interior(), &[1, 2, 3, 4]);
        assert_eq!(path.source(), Some(&0));
        assert_eq!(path.destination(), Some(&5));
    }

    // --- All shortest paths tests ---

    #[test]
    fn test_all_shortest_paths_map_multi() {
        let g = multi_path_graph();
        let tree = all_shortest_paths_map(&g, &1, &5).unwrap().unwrap();
        assert_eq!(tree.distance(&5), Some(2));
        assert_eq!(tree.predecessors_of(&5).len(), 3);
    }

    #[test]
    fn test_all_shortest_path_nodes_multi() {
        let g = multi_path_graph();
        let (nodes, dist) = all_shortest_path_nodes(&g, &1, &5).unwrap().unwrap();
        assert_eq!(dist, 2);
        let expected: HashSet<u32> = [1, 2, 3, 5].into_iter().collect();
        assert_eq!(nodes, expected);
        assert!(!nodes.contains(&4));
    }

    #[test]
    fn test_all_shortest_path_nodes_superset_of_single() {
        let g = wikipedia_graph();
        let single = shortest_path(&g, &1, &5).unwrap().unwrap();
        let (nodes, dist) = all_shortest_path_nodes(&g, &1, &5).unwrap().unwrap();
        assert_eq!(dist, single.weight);
        assert!(single.nodes.iter().all(|n| nodes.contains(n)));
    }

    #[test]
    fn test_all_shortest_path_nodes_no_path() {
        let g = no_path_graph();
        assert!(all_shortest_path_nodes(&g, &1, &4).unwrap().is_none());
    }

    // --- Disjoint path iterator tests ---

    #[test]
    fn test_disjoint_fan_yields_every_branch() {
        let g = fan_graph(8);
        let mut it = disjoint_shortest_paths(&g, &0, &1).unwrap();
        let mut middles = HashSet::new();
        let mut count = 0;
        while it.advance() {
            let path = it.current().unwrap();
            assert_eq!(path.nodes.len(), 3);
            assert_eq!(path.weight, 2);
            middles.insert(path.nodes[1]);
            count += 1;
        }
        assert_eq!(count, 8);
        assert_eq!(middles.len(), 8);
        assert!(!it.advance());
        assert!(it.current().is_none());
    }

    #[test]
    fn test_disjoint_shuffled_fan_still_complete() {
        let g = fan_graph(5);
        let mut it = disjoint_shortest_paths(&g, &0, &1).unwrap();
        it.shuffle_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(it.count(), 5);
    }

    #[test]
    fn test_disjoint_shuffle_with_config_is_reproducible() {
        let g = fan_graph(6);
        let config = EngineConfig {
            seed: Some(9),
            ..EngineConfig::default()
        };
        let run = || {
            let mut it = disjoint_shortest_paths(&g, &0, &1).unwrap();
            it.shuffle_with_config(&config);
            it.map(|p| p.nodes).collect::<Vec<Vec<u32>>>()
        };
        let a = run();
        assert_eq!(a.len(), 6);
        assert_eq!(a, run());
    }

    #[test]
    fn test_disjoint_wikipedia_single_path() {
        let g = wikipedia_graph();
        let paths: Vec<_> = disjoint_shortest_paths(&g, &1, &5).unwrap().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![1, 3, 6, 5]);
    }

    #[test]
    fn test_disjoint_shared_prefix_exhausts_early() {
        // 0 -> 1 -> {2, 3} -> 4: two shortest paths, but both need node 1's
        // single predecessor, so only one is produced.
        let g = Graph::from_edges(
            true,
            vec![(0u32, 1u32, 1u32), (1, 2, 1), (1, 3, 1), (2, 4, 1), (3, 4, 1)],
        )
        .unwrap();
        let paths: Vec<_> = disjoint_shortest_paths(&g, &0, &4).unwrap().collect();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_disjoint_no_path() {
        let g = no_path_graph();
        let mut it = disjoint_shortest_paths(&g, &1, &5).unwrap();
        assert!(!it.advance());
        assert!(it.current().is_none());
    }

    #[test]
    fn test_disjoint_source_is_destination() {
        let g = wikipedia_graph();
        let paths: Vec<_> = disjoint_shortest_paths(&g, &2, &2).unwrap().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![2]);
    }

    #[test]
    fn test_disjoint_multi_path_graph() {
        let g = multi_path_graph();
        let paths: Vec<_> = disjoint_shortest_paths(&g, &1, &5).unwrap().collect();
        assert_eq!(paths.len(), 3);
        for p in &paths {
            assert_eq!(g.path_weight(&p.nodes), Some(2));
        }
    }
}
