//! gridroll-graph — which nodes may reboot together.
//!
//! Two nodes conflict when some instance has one of them as primary and
//! the other as secondary: rebooting both at once would take the
//! instance down with no standby left. The planner builds this conflict
//! graph over the candidate nodes, then colors it — every color class
//! is a set of nodes that can safely reboot in the same window.
//!
//! # Components
//!
//! - **`graph`** — `ConflictGraph` construction (all-instance and
//!   reboot-only flavors)
//! - **`coloring`** — LF, DSATUR, and RLF heuristics plus best-of
//!   selection

pub mod coloring;
pub mod graph;

pub use coloring::{best_coloring, color_dsatur, color_lf, color_rlf, BestColoring, ColorMap, ColoringStats};
pub use graph::{ConflictGraph, GraphError, GraphFlavor, GraphResult};
