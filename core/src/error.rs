use std::fmt::Debug;

use thiserror::Error;

/// Errors raised by graph construction and path queries.
///
/// "No path" is never an error: queries report it as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {node} is not in the graph")]
    NodeNotFound { node: String },

    #[error("edge ({from}, {to}) has a negative weight: {weight}")]
    NegativeWeight {
        from: String,
        to: String,
        weight: String,
    },

    #[error("node {node} is already in the graph")]
    DuplicateNode { node: String },

    #[error("edge ({from}, {to}) is already in the graph")]
    DuplicateEdge { from: String, to: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl GraphError {
    pub(crate) fn node_not_found<N: Debug>(node: &N) -> Self {
        GraphError::NodeNotFound {
            node: format!("{:?}", node),
        }
    }

    pub(crate) fn negative_weight<N: Debug, W: Debug>(from: &N, to: &N, weight: W) -> Self {
        GraphError::NegativeWeight {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
            weight: format!("{:?}", weight),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
