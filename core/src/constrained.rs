use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use num_traits::Zero;

use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, NeighborRecord};
use crate::paths::Path;
use crate::weight::Weight;

/// Partial path on the search frontier, ordered by accumulated cost and then
/// by length so that among equal costs the shorter path is expanded first.
#[derive(Debug, Clone)]
struct Candidate<N, C, W> {
    cost: C,
    weight: W,
    nodes: Vec<N>,
}

impl<N, C: PartialOrd, W> PartialEq for Candidate<N, C, W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N, C: PartialOrd, W> Eq for Candidate<N, C, W> {}

impl<N, C: PartialOrd, W> PartialOrd for Candidate<N, C, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N, C: PartialOrd, W> Ord for Candidate<N, C, W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .partial_cmp(&other.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.nodes.len().cmp(&other.nodes.len()))
    }
}

/// Cheapest simple path from `source` to `dest` whose total weight is at
/// least `min_cost`.
///
/// Partial paths are expanded in increasing cost order; arrivals at `dest`
/// below the floor are discarded and the search continues. A `(node, cost)`
/// pair is expanded at most once. `Ok(None)` if the frontier runs dry.
#[tracing::instrument(level = "debug", skip_all, fields(source = ?source, dest = ?dest, min_cost = ?min_cost))]
pub fn shortest_path_with_min_cost<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
    min_cost: G::Weight,
) -> Result<Option<Path<G::Node, G::Weight>>> {
    let found = floor_search(
        graph,
        source,
        dest,
        G::Weight::zero(),
        min_cost,
        |from, edge, cost| {
            if edge.weight.is_negative() {
                return Err(GraphError::negative_weight(from, &edge.node, edge.weight));
            }
            Ok(cost.saturating_add(edge.weight))
        },
    )?;
    Ok(found.map(|c| Path {
        nodes: c.nodes,
        weight: c.cost,
    }))
}

/// Fewest-hop simple path from `source` to `dest` with at least `min_nodes`
/// nodes (endpoints included).
///
/// [`Path::weight`] is the sum of the edge weights along the path, not its
/// node count and not the search cost. The node count is `nodes.len()`.
#[tracing::instrument(level = "debug", skip_all, fields(source = ?source, dest = ?dest, min_nodes = min_nodes))]
pub fn shortest_path_with_min_nodes<G: GraphStore>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
    min_nodes: usize,
) -> Result<Option<Path<G::Node, G::Weight>>> {
    let found = floor_search(graph, source, dest, 1usize, min_nodes, |_, _, hops| {
        Ok(hops.saturating_add(1))
    })?;
    Ok(found.map(|c| Path {
        nodes: c.nodes,
        weight: c.weight,
    }))
}

fn floor_search<G, C, F>(
    graph: &G,
    source: &G::Node,
    dest: &G::Node,
    start: C,
    floor: C,
    step: F,
) -> Result<Option<Candidate<G::Node, C, G::Weight>>>
where
    G: GraphStore,
    C: Weight,
    F: Fn(&G::Node, &NeighborRecord<G::Node, G::Weight>, C) -> Result<C>,
{
    if !graph.has_node(source) {
        return Err(GraphError::node_not_found(source));
    }
    if !graph.has_node(dest) {
        return Err(GraphError::node_not_found(dest));
    }

    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse(Candidate {
        cost: start,
        weight: G::Weight::zero(),
        nodes: vec![source.clone()],
    }));
    let mut expanded: HashSet<(G::Node, u64)> = HashSet::with_capacity(graph.node_count());
    let mut popped = 0usize;

    while let Some(Reverse(candidate)) = frontier.pop() {
        popped += 1;
        let Some(last) = candidate.nodes.last() else {
            continue;
        };
        if last == dest && candidate.cost >= floor {
            tracing::debug!(popped, cost = ?candidate.cost, "floor satisfied");
            return Ok(Some(candidate));
        }

        for edge in graph.neighbors(last) {
            // Simple paths only
            if candidate.nodes.contains(&edge.node) {
                continue;
            }
            let cost = step(last, edge, candidate.cost)?;
            if cost.is_infinite() {
                continue;
            }
            if !expanded.insert((edge.node.clone(), cost.memo_key())) {
                continue;
            }
            if edge.node == *dest && cost < floor {
                continue;
            }

            let mut nodes = Vec::with_capacity(candidate.nodes.len() + 1usize);
            nodes.extend_from_slice(&candidate.nodes);
            nodes.push(edge.node.clone());
            frontier.push(Reverse(Candidate {
                cost,
                weight: candidate.weight.saturating_add(edge.weight),
                nodes,
            }));
        }
    }

    tracing::debug!(popped, "frontier exhausted below floor");
    Ok(None)
}
