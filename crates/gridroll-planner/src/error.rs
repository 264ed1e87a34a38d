//! Planner error types.

use thiserror::Error;

use gridroll_cluster::ClusterError;
use gridroll_graph::GraphError;

/// Result type alias for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Fatal planning failures.
///
/// Every variant terminates planning; the only downgrade is
/// `NoMaster` under the force option, which the assembler turns into a
/// warning before this error would be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("no master node in the cluster")]
    NoMaster,

    #[error("multiple master nodes: {}", .names.join(", "))]
    MultipleMasters { names: Vec<String> },

    #[error("unknown cluster group: {0}")]
    UnknownGroup(String),

    #[error("cannot evacuate the non-redundant instances of node {node}")]
    NoCapacity { node: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}
