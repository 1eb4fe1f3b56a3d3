//! Reference graphs shared by the unit tests.

use crate::graph::Graph;

fn undirected(node_count: u32, edges: &[(u32, u32, u32)]) -> Graph<u32, u32> {
    let mut g = Graph::new_undirected();
    for n in 1..=node_count {
        g.add_node(n).unwrap();
    }
    for &(from, to, weight) in edges {
        g.add_edge(from, to, weight).unwrap();
    }
    g
}

/// The six-node example from the Wikipedia article on Dijkstra's algorithm.
/// Shortest 1 -> 5 is 1-3-6-5 with weight 20.
pub fn wikipedia_graph() -> Graph<u32, u32> {
    undirected(
        6,
        &[
            (1, 2, 7),
            (1, 6, 14),
            (1, 3, 9),
            (2, 4, 15),
            (2, 3, 10),
            (3, 6, 2),
            (3, 4, 11),
            (4, 5, 6),
            (6, 5, 9),
        ],
    )
}

/// Four-node graph: distances from 1 are 24, 3 and 15 to nodes 2, 3, 4.
pub fn hackerrank_graph() -> Graph<u32, u32> {
    undirected(4, &[(1, 2, 24), (1, 4, 20), (3, 1, 3), (4, 3, 12)])
}

/// Nodes 4 and 5 are isolated from 1.
pub fn no_path_graph() -> Graph<u32, u32> {
    undirected(5, &[(1, 2, 1), (1, 3, 1)])
}

/// Three shortest 1 -> 5 routes of weight 2: 1-5, 1-2-5, 1-3-5.
pub fn multi_path_graph() -> Graph<u32, u32> {
    undirected(
        5,
        &[
            (1, 2, 1),
            (1, 3, 1),
            (2, 5, 1),
            (3, 5, 1),
            (1, 4, 5),
            (4, 5, 10),
            (1, 5, 2),
        ],
    )
}

/// Complete undirected graph on `0..n` with unit weights.
pub fn fully_connected_graph(n: u32) -> Graph<u32, u32> {
    let mut g = Graph::new_undirected();
    for i in 0..n {
        g.add_node(i).unwrap();
    }
    for i in 0..n {
        for j in (i + 1)..n {
            g.add_edge(i, j, 1).unwrap();
        }
    }
    g
}

/// Directed fan: 0 -> m -> 1 for `width` middle nodes `2..width + 2`.
pub fn fan_graph(width: u32) -> Graph<u32, u32> {
    let mut g = Graph::new_directed();
    for i in 0..width + 2 {
        g.add_node(i).unwrap();
    }
    for m in 2..width + 2 {
        g.add_edge(0, m, 1).unwrap();
        g.add_edge(m, 1, 1).unwrap();
    }
    g
}

/// Undirected path 0 - 1 - ... - (n-1) with unit weights.
pub fn chain_graph(n: u32) -> Graph<u32, u32> {
    Graph::from_edges(false, (0..n.saturating_sub(1)).map(|i| (i, i + 1, 1))).unwrap()
}
