//! graph-paths-core: Weighted graph path engine.
//!
//! A pure Rust library over an in-memory adjacency list providing
//! Dijkstra shortest paths (single and tie-aware), destructive
//! disjoint-path iteration, minimum-cost and minimum-hop constrained
//! searches, resumable simple-path enumeration, and parallel
//! betweenness centrality.
//!
//! Algorithms are generic over [`GraphStore`], so any read-only adjacency
//! view can be queried; [`Graph`] is the bundled implementation. Edge
//! weights are any [`Weight`]: signed or unsigned integers and floats,
//! with saturating accumulation at the type's "unreachable" sentinel.

mod centrality;
mod config;
mod constrained;
mod dijkstra;
mod error;
mod graph;
mod paths;
mod queue;
mod simple_path;
mod weight;

#[cfg(test)]
mod fixtures;

pub use centrality::{
    all_shortest_paths_betweenness_centrality,
    all_shortest_paths_betweenness_centrality_subset,
    all_shortest_paths_betweenness_centrality_subset_with_config,
    all_shortest_paths_betweenness_centrality_with_config, betweenness_centrality,
    betweenness_centrality_subset, betweenness_centrality_subset_with_config,
    betweenness_centrality_with_config,
};
pub use config::{EngineConfig, ENV_CUTOFF_HOPS, ENV_SEED, ENV_THREADS, MAX_CENTRALITY_THREADS};
pub use constrained::{shortest_path_with_min_cost, shortest_path_with_min_nodes};
pub use dijkstra::{single_pair, single_source, ShortestPathTree};
pub use error::{GraphError, Result};
pub use graph::{Graph, GraphStore, NeighborRecord, WeightedEdge};
pub use paths::{
    all_shortest_path_nodes, all_shortest_paths_map, disjoint_shortest_paths, shortest_path,
    shortest_path_excluding, DisjointShortestPaths, Path,
};
pub use queue::IndexedPriorityQueue;
pub use simple_path::{
    all_simple_paths, all_simple_paths_with_heuristic, has_simple_path, simple_path, SimplePaths,
};
pub use weight::Weight;
