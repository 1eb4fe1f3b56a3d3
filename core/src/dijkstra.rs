use std::collections::{HashMap, HashSet};

use num_traits::Zero;

use crate::error::{GraphError, Result};
use crate::graph::GraphStore;
use crate::queue::IndexedPriorityQueue;
use crate::weight::Weight;

/// Output of one relaxation run from a fixed source.
///
/// `predecessors` maps a node to the neighbors through which it reaches its
/// best known distance; the source never appears as a key. With tie recording
/// a list may hold several equally good predecessors, in discovery order.
/// `distances` only holds finalized (dequeued) nodes.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<N, W> {
    pub(crate) source: N,
    pub(crate) predecessors: HashMap<N, Vec<N>>,
    pub(crate) distances: HashMap<N, W>,
}

impl<N, W> ShortestPathTree<N, W>
where
    N: Clone + Eq + std::hash::Hash,
    W: Weight,
{
    pub fn source(&self) -> &N {
        &self.source
    }

    /// Finalized distance from the source, `None` if the node was not reached
    /// (or not settled before an early stop).
    pub fn distance(&self, node: &N) -> Option<W> {
        self.distances.get(node).copied()
    }

    pub fn distances(&self) -> &HashMap<N, W> {
        &self.distances
    }

    pub fn predecessors(&self) -> &HashMap<N, Vec<N>> {
        &self.predecessors
    }

    pub fn predecessors_of(&self, node: &N) -> &[N] {
        self.predecessors.get(node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Hand the predecessor relation to the caller. The returned map is owned
    /// and shares nothing with the engine's working state.
    pub fn into_predecessors(self) -> HashMap<N, Vec<N>> {
        self.predecessors
    }
}

/// Dijkstra from `source` over the whole reachable graph.
///
/// `excluded` nodes are never queued and never relaxed into (the source is
/// always kept). Fails on an unknown source or on the first negative edge
/// weight met during relaxation.
#[tracing::instrument(level = "trace", skip_all, fields(source = ?source, record_ties = record_ties))]
pub fn single_source<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    record_ties: bool,
    excluded: &HashSet<G::Node>,
) -> Result<ShortestPathTree<G::Node, G::Weight>> {
    if !graph.has_node(source) {
        return Err(GraphError::node_not_found(source));
    }
    relax(graph, source, None, record_ties, excluded)
}

/// Dijkstra from `source` that stops as soon as `dest` is settled.
///
/// Returns `Ok(None)` when `dest` is unreachable (or excluded). Distances of
/// nodes other than the destination may be partial.
pub fn single_pair<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
    record_ties: bool,
    excluded: &HashSet<G::Node>,
) -> Result<Option<ShortestPathTree<G::Node, G::Weight>>> {
    if !graph.has_node(source) {
        return Err(GraphError::node_not_found(source));
    }
    if !graph.has_node(dest) {
        return Err(GraphError::node_not_found(dest));
    }

    let tree = relax(graph, source, Some(dest), record_ties, excluded)?;
    if tree.distances.contains_key(dest) {
        Ok(Some(tree))
    } else {
        Ok(None)
    }
}

fn relax<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    target: Option<&G::Node>,
    record_ties: bool,
    excluded: &HashSet<G::Node>,
) -> Result<ShortestPathTree<G::Node, G::Weight>> {
    let infinity = G::Weight::infinity();

    let mut queue: IndexedPriorityQueue<G::Node, G::Weight> =
        std::iter::once((source.clone(), G::Weight::zero()))
            .chain(
                graph
                    .nodes()
                    .filter(|n| *n != source && !excluded.contains(*n))
                    .map(|n| (n.clone(), infinity)),
            )
            .collect();

    let mut predecessors: HashMap<G::Node, Vec<G::Node>> = HashMap::new();
    let mut distances: HashMap<G::Node, G::Weight> = HashMap::with_capacity(queue.len());

    while let Some((u, du)) = queue.pop_min() {
        // Everything still queued is unreachable.
        if du.is_infinite() {
            break;
        }
        distances.insert(u.clone(), du);
        if target == Some(&u) {
            break;
        }

        for edge in graph.neighbors(&u) {
            if excluded.contains(&edge.node) {
                continue;
            }
            if edge.weight.is_negative() {
                return Err(GraphError::negative_weight(&u, &edge.node, edge.weight));
            }
            if !queue.is_queued(&edge.node) {
                continue;
            }

            let alt = du.saturating_add(edge.weight);
            let current = queue.priority(&edge.node).unwrap_or(infinity);
            if alt < current {
                predecessors.insert(edge.node.clone(), vec![u.clone()]);
                queue.decrease_key(&edge.node, alt);
            } else if record_ties && alt == current && !alt.is_infinite() {
                predecessors
                    .entry(edge.node.clone())
                    .or_default()
                    .push(u.clone());
            }
        }
    }

    tracing::trace!(
        source = ?source,
        settled = distances.len(),
        record_ties,
        "relaxation finished"
    );

    Ok(ShortestPathTree {
        source: source.clone(),
        predecessors,
        distances,
    })
}
