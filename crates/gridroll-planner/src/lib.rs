//! gridroll-planner — turns a cluster snapshot into a reboot plan.
//!
//! The pipeline: filter the candidate nodes, build the conflict graph,
//! color it with three heuristics and keep the smallest coloring, split
//! each color class by simulated evacuation capacity for non-redundant
//! instances, then order the groups (largest first, master last).
//!
//! ```text
//! ClusterData ──filter──▶ vertex set ──▶ ConflictGraph
//!                                            │ best_coloring
//!                                            ▼
//!                        color classes ──partition──▶ reboot windows
//!                                            │ order + master-last
//!                                            ▼
//!                                       RebootPlan
//! ```
//!
//! Everything is pure and synchronous: the planner never touches the
//! cluster, it only emits the plan.

pub mod error;
pub mod evacuate;
pub mod options;
pub mod plan;

pub use error::{PlanError, PlanResult};
pub use evacuate::{greedy_clear_nodes, partition_non_redundant};
pub use options::PlanOptions;
pub use plan::{build_plan, PlanStats, RebootGroup, RebootPlan};
