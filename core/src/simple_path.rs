use std::cmp::Ordering;
use std::collections::HashSet;

use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, NeighborRecord};
use crate::paths::Path;
use crate::weight::Weight;

fn validate<G: GraphStore>(graph: &G, source: &G::Node, dest: &G::Node) -> Result<()> {
    if !graph.has_node(source) {
        return Err(GraphError::node_not_found(source));
    }
    if !graph.has_node(dest) {
        return Err(GraphError::node_not_found(dest));
    }
    Ok(())
}

/// True if `dest` can be reached from `source` along outgoing edges.
pub fn has_simple_path<G: GraphStore>(graph: &G, source: &G::Node, dest: &G::Node) -> Result<bool> {
    validate(graph, source, dest)?;
    Ok(depth_first(graph, source, dest).is_some())
}

/// Some simple path from `source` to `dest`, the first one found by a
/// depth-first walk in neighbor order. Not necessarily the shortest.
pub fn simple_path<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
) -> Result<Option<Path<G::Node, G::Weight>>> {
    validate(graph, source, dest)?;
    Ok(depth_first(graph, source, dest))
}

/// Iterative DFS with a cursor per stack level. Visited marks are never
/// cleared: a node that failed once cannot succeed through another prefix.
fn depth_first<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
) -> Option<Path<G::Node, G::Weight>> {
    if source == dest {
        return Some(Path {
            nodes: vec![source.clone()],
            weight: G::Weight::zero(),
        });
    }

    let mut visited: HashSet<G::Node> = HashSet::new();
    visited.insert(source.clone());
    // (node, weight so far, next neighbor index)
    let mut stack: Vec<(G::Node, G::Weight, usize)> = vec![(source.clone(), G::Weight::zero(), 0)];

    while let Some((node, weight, cursor)) = stack.last_mut() {
        let Some(edge) = graph.neighbors(node).get(*cursor) else {
            stack.pop();
            continue;
        };
        *cursor += 1;
        let reached = weight.saturating_add(edge.weight);

        if edge.node == *dest {
            let mut nodes: Vec<G::Node> = stack.iter().map(|(n, _, _)| n.clone()).collect();
            nodes.push(edge.node.clone());
            return Some(Path {
                nodes,
                weight: reached,
            });
        }
        if visited.insert(edge.node.clone()) {
            stack.push((edge.node.clone(), reached, 0));
        }
    }
    None
}

type Heuristic<'g, N, W> = Box<dyn Fn(&NeighborRecord<N, W>, &NeighborRecord<N, W>) -> Ordering + 'g>;

/// One DFS level: a node, the weight to reach it, and the neighbor slots
/// not tried yet.
#[derive(Debug, Clone)]
struct Frame<N, W> {
    node: N,
    weight: W,
    untried: Vec<usize>,
}

/// Resumable enumeration of simple paths between two nodes.
///
/// Each [`advance`](SimplePaths::advance) resumes the depth-first search
/// where the previous one stopped. Without a heuristic the next edge is
/// drawn uniformly at random from the top frame; with one, each frame tries
/// its edges in ascending heuristic order. Nodes are unmarked when their
/// frame is popped, so every simple path is produced exactly once.
///
/// `cutoff_hops` bounds the number of nodes of a produced path, endpoints
/// included, and `cutoff_weight` its total weight. Once exhausted the iterator stays
/// exhausted.
pub struct SimplePaths<'g, G: GraphStore> {
    graph: &'g G,
    dest: G::Node,
    cutoff_weight: G::Weight,
    cutoff_hops: usize,
    visited: HashSet<G::Node>,
    stack: Vec<Frame<G::Node, G::Weight>>,
    heuristic: Option<Heuristic<'g, G::Node, G::Weight>>,
    rng: StdRng,
    trivial: bool,
    current: Option<Path<G::Node, G::Weight>>,
}

/// Enumerate every simple path from `source` to `dest` in random order.
pub fn all_simple_paths<'g, G: GraphStore>(
    graph: &'g G,
    source: &G::Node,
    dest: &G::Node,
) -> Result<SimplePaths<'g, G>> {
    validate(graph, source, dest)?;
    Ok(SimplePaths::new(graph, source, dest, None))
}

/// Enumerate simple paths trying, at every node, the neighbors that compare
/// lowest under `heuristic` first.
pub fn all_simple_paths_with_heuristic<'g, G, F>(
    graph: &'g G,
    source: &G::Node,
    dest: &G::Node,
    heuristic: F,
) -> Result<SimplePaths<'g, G>>
where
    G: GraphStore,
    F: Fn(&NeighborRecord<G::Node, G::Weight>, &NeighborRecord<G::Node, G::Weight>) -> Ordering + 'g,
{
    validate(graph, source, dest)?;
    Ok(SimplePaths::new(graph, source, dest, Some(Box::new(heuristic))))
}

impl<'g, G: GraphStore> SimplePaths<'g, G> {
    fn new(
        graph: &'g G,
        source: &G::Node,
        dest: &G::Node,
        heuristic: Option<Heuristic<'g, G::Node, G::Weight>>,
    ) -> Self {
        let mut paths = SimplePaths {
            graph,
            dest: dest.clone(),
            cutoff_weight: G::Weight::infinity(),
            cutoff_hops: usize::MAX,
            visited: HashSet::new(),
            stack: Vec::new(),
            heuristic,
            rng: StdRng::from_os_rng(),
            trivial: source == dest,
            current: None,
        };
        if !paths.trivial {
            paths.visited.insert(source.clone());
            let root = paths.frame(source.clone(), G::Weight::zero());
            paths.stack.push(root);
        }
        paths
    }

    /// Skip paths heavier than `weight`.
    pub fn with_cutoff_weight(mut self, weight: G::Weight) -> Self {
        self.cutoff_weight = weight;
        self
    }

    /// Skip paths with more than `hops` nodes, endpoints included.
    pub fn with_cutoff_hops(mut self, hops: usize) -> Self {
        self.cutoff_hops = hops;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Apply the configured seed and default hop cutoff, when set.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        if config.seed.is_some() {
            self.rng = config.rng();
        }
        if let Some(hops) = config.default_cutoff_hops {
            self.cutoff_hops = hops;
        }
        self
    }

    fn frame(&self, node: G::Node, weight: G::Weight) -> Frame<G::Node, G::Weight> {
        let edges = self.graph.neighbors(&node);
        let mut untried: Vec<usize> = (0..edges.len()).collect();
        if let Some(heuristic) = &self.heuristic {
            // Best candidate last, popped first
            untried.sort_by(|&a, &b| heuristic(&edges[a], &edges[b]));
            untried.reverse();
        }
        Frame {
            node,
            weight,
            untried,
        }
    }

    /// Search for the next path. Returns false once every path has been
    /// produced; from then on every call returns false.
    pub fn advance(&mut self) -> bool {
        if self.trivial {
            self.trivial = false;
            self.current = Some(Path {
                nodes: vec![self.dest.clone()],
                weight: G::Weight::zero(),
            });
            return true;
        }

        let graph = self.graph;
        while let Some(top) = self.stack.last_mut() {
            let slot = if self.heuristic.is_some() {
                top.untried.pop()
            } else if top.untried.is_empty() {
                None
            } else {
                let i = self.rng.random_range(0..top.untried.len());
                Some(top.untried.swap_remove(i))
            };

            let Some(slot) = slot else {
                if let Some(done) = self.stack.pop() {
                    self.visited.remove(&done.node);
                }
                continue;
            };
            let Some(edge) = graph.neighbors(&top.node).get(slot) else {
                continue;
            };
            let weight = top.weight.saturating_add(edge.weight);
            let depth = self.stack.len();

            if weight > self.cutoff_weight {
                continue;
            }
            if edge.node == self.dest {
                if depth + 1 > self.cutoff_hops {
                    continue;
                }
                let mut nodes: Vec<G::Node> = self.stack.iter().map(|f| f.node.clone()).collect();
                nodes.push(edge.node.clone());
                self.current = Some(Path { nodes, weight });
                return true;
            }
            if depth + 1 < self.cutoff_hops && self.visited.insert(edge.node.clone()) {
                let frame = self.frame(edge.node.clone(), weight);
                self.stack.push(frame);
            }
        }

        tracing::trace!(dest = ?self.dest, "simple path stack exhausted");
        self.visited.clear();
        self.current = None;
        false
    }

    /// Path produced by the last successful `advance`.
    pub fn current(&self) -> Option<&Path<G::Node, G::Weight>> {
        self.current.as_ref()
    }
}

impl<G: GraphStore> Iterator for SimplePaths<'_, G> {
    type Item = Path<G::Node, G::Weight>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            self.current.clone()
        } else {
            None
        }
    }
}
