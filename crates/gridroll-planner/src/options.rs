//! Planner configuration.

use serde::{Deserialize, Serialize};

/// What to plan and how strict to be.
///
/// Rendering concerns (move printing, headers, output format,
/// verbosity) belong to the driver, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Restrict planning to nodes in the named cluster group.
    pub group: Option<String>,
    /// Restrict planning to nodes carrying any of these tags.
    pub node_tags: Vec<String>,
    /// Plan for offline maintenance: even stopped instances keep their
    /// hosts apart.
    pub offline_maintenance: bool,
    /// Leave nodes hosting non-redundant instances out of the plan.
    pub skip_non_redundant: bool,
    /// Do not evacuate non-redundant instances; reboot groups are the
    /// raw color classes.
    pub ignore_non_redundant: bool,
    /// Emit only the first reboot group.
    pub one_step_only: bool,
    /// Downgrade a missing master from fatal to a warning.
    pub force: bool,
}
