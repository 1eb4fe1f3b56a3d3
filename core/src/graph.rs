use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use num_traits::Zero;

use crate::error::{GraphError, Result};
use crate::weight::Weight;

/// Outgoing edge view returned by neighbor lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborRecord<N, W> {
    pub node: N,
    pub weight: W,
}

/// A weighted edge as reported by [`Graph::edges`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge<N, W> {
    pub from: N,
    pub to: N,
    pub weight: W,
}

/// Read-only adjacency view consumed by every algorithm in this crate.
///
/// Implementations must not change while a query runs; centrality shares one
/// store across worker threads without synchronization.
pub trait GraphStore {
    type Node: Clone + Eq + Hash + Debug;
    type Weight: Weight;

    fn has_node(&self, node: &Self::Node) -> bool;

    /// Outgoing edges of `node`, in insertion order. Unknown nodes have none.
    fn neighbors(&self, node: &Self::Node) -> &[NeighborRecord<Self::Node, Self::Weight>];

    fn node_count(&self) -> usize;

    fn is_directed(&self) -> bool;

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> + '_;

    fn has_edge(&self, from: &Self::Node, to: &Self::Node) -> bool {
        self.neighbors(from).iter().any(|e| &e.node == to)
    }
}

/// In-memory weighted graph: node registry + per-node adjacency lists.
///
/// Undirected graphs store every edge twice, once per endpoint (self-loops
/// once). Node iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct Graph<N, W> {
    index: HashMap<N, usize>,
    order: Vec<N>,
    adjacency: HashMap<N, Vec<NeighborRecord<N, W>>>,
    directed: bool,
    edge_count: usize,
}

impl<N, W> Graph<N, W>
where
    N: Clone + Eq + Hash + Debug,
    W: Weight,
{
    pub fn new_directed() -> Self {
        Self::with_capacity(true, 0)
    }

    pub fn new_undirected() -> Self {
        Self::with_capacity(false, 0)
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(directed: bool, node_count: usize) -> Self {
        Self {
            index: HashMap::with_capacity(node_count),
            order: Vec::with_capacity(node_count),
            adjacency: HashMap::with_capacity(node_count),
            directed,
            edge_count: 0,
        }
    }

    /// Bulk load from `(from, to, weight)` triples. Endpoints are registered
    /// on first sight; a repeated edge is an error.
    pub fn from_edges<I>(directed: bool, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, N, W)>,
    {
        let mut graph = Self::with_capacity(directed, 0);
        for (from, to, weight) in edges {
            if !graph.has_node(&from) {
                graph.add_node(from.clone())?;
            }
            if !graph.has_node(&to) {
                graph.add_node(to.clone())?;
            }
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, node: N) -> Result<()> {
        if self.index.contains_key(&node) {
            return Err(GraphError::DuplicateNode {
                node: format!("{:?}", node),
            });
        }
        self.index.insert(node.clone(), self.order.len());
        self.order.push(node);
        Ok(())
    }

    pub fn has_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Add an edge. Undirected graphs also record the reverse direction.
    pub fn add_edge(&mut self, from: N, to: N, weight: W) -> Result<()> {
        self.check_endpoints(&from, &to)?;
        if self.has_edge(&from, &to) {
            return Err(GraphError::DuplicateEdge {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
            });
        }

        if !self.directed && from != to {
            self.adjacency
                .entry(to.clone())
                .or_default()
                .push(NeighborRecord { node: from.clone(), weight });
        }
        self.adjacency
            .entry(from)
            .or_default()
            .push(NeighborRecord { node: to, weight });
        self.edge_count += 1;
        Ok(())
    }

    pub fn edge_weight(&self, from: &N, to: &N) -> Option<W> {
        self.neighbors(from)
            .iter()
            .find(|e| &e.node == to)
            .map(|e| e.weight)
    }

    pub fn has_edge(&self, from: &N, to: &N) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Get outgoing edges for a node.
    pub fn neighbors(&self, node: &N) -> &[NeighborRecord<N, W>] {
        self.adjacency.get(node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, node: &N) -> Result<()> {
        let Some(position) = self.index.remove(node) else {
            return Err(GraphError::node_not_found(node));
        };
        self.order.remove(position);
        for (i, n) in self.order.iter().enumerate().skip(position) {
            self.index.insert(n.clone(), i);
        }

        let outgoing = self.adjacency.remove(node).map_or(0, |edges| edges.len());
        let mut incoming = 0;
        for edges in self.adjacency.values_mut() {
            let before = edges.len();
            edges.retain(|e| &e.node != node);
            incoming += before - edges.len();
        }

        // Undirected: each incoming entry mirrors an outgoing one, except a
        // self-loop, which was stored once and already counted as outgoing.
        self.edge_count -= if self.directed { outgoing + incoming } else { outgoing };
        Ok(())
    }

    pub fn remove_edge(&mut self, from: &N, to: &N) -> Result<()> {
        self.check_endpoints(from, to)?;
        let removed = self.remove_directed(from, to);
        if !self.directed && from != to {
            self.remove_directed(to, from);
        }
        if removed {
            self.edge_count -= 1;
        }
        Ok(())
    }

    fn remove_directed(&mut self, from: &N, to: &N) -> bool {
        match self.adjacency.get_mut(from) {
            Some(edges) => {
                let before = edges.len();
                edges.retain(|e| &e.node != to);
                edges.len() != before
            }
            None => false,
        }
    }

    fn check_endpoints(&self, from: &N, to: &N) -> Result<()> {
        if !self.has_node(from) {
            return Err(GraphError::node_not_found(from));
        }
        if !self.has_node(to) {
            return Err(GraphError::node_not_found(to));
        }
        Ok(())
    }

    /// Out-degree (degree, for undirected graphs) of a node.
    pub fn degree(&self, node: &N) -> Option<usize> {
        self.has_node(node).then(|| self.neighbors(node).len())
    }

    /// `(node, degree)` for every node, in insertion order.
    pub fn degrees(&self) -> impl Iterator<Item = (&N, usize)> + '_ {
        self.order.iter().map(|n| (n, self.neighbors(n).len()))
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.order.iter()
    }

    /// Every edge once. Undirected edges are reported from the endpoint
    /// that was inserted first.
    pub fn edges(&self) -> impl Iterator<Item = WeightedEdge<N, W>> + '_ {
        self.order.iter().flat_map(move |from| {
            let from_pos = self.index[from];
            self.neighbors(from)
                .iter()
                .filter(move |e| self.directed || from_pos <= self.index[&e.node])
                .map(move |e| WeightedEdge {
                    from: from.clone(),
                    to: e.node.clone(),
                    weight: e.weight,
                })
        })
    }

    /// Total weight of walking `nodes` edge by edge, or `None` if some
    /// consecutive pair is not connected.
    pub fn path_weight(&self, nodes: &[N]) -> Option<W> {
        nodes.windows(2).try_fold(W::zero(), |total, pair| {
            self.edge_weight(&pair[0], &pair[1]).map(|w| total.saturating_add(w))
        })
    }
}

impl<N, W> Default for Graph<N, W>
where
    N: Clone + Eq + Hash + Debug,
    W: Weight,
{
    fn default() -> Self {
        Self::new_directed()
    }
}

impl<N, W> GraphStore for Graph<N, W>
where
    N: Clone + Eq + Hash + Debug,
    W: Weight,
{
    type Node = N;
    type Weight = W;

    fn has_node(&self, node: &N) -> bool {
        Graph::has_node(self, node)
    }

    fn neighbors(&self, node: &N) -> &[NeighborRecord<N, W>] {
        Graph::neighbors(self, node)
    }

    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.order.iter()
    }

    fn has_edge(&self, from: &N, to: &N) -> bool {
        Graph::has_edge(self, from, to)
    }
}
