//! Error types for the cluster model.

use thiserror::Error;

use crate::node::CapacityFail;

/// Result type alias for cluster model operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur while reading or simulating cluster state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("{kind} index not found: {idx}")]
    NotFound { kind: &'static str, idx: i32 },

    #[error("cannot place instance {instance} on node {node}: {fail}")]
    Placement {
        instance: String,
        node: String,
        fail: CapacityFail,
    },

    #[error("no capacity for instance {instance} on any candidate node")]
    NoCapacity { instance: String },
}
