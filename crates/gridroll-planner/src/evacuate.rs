//! Capacity-aware splitting of color classes.
//!
//! A color class is safe with respect to redundancy, but rebooting all
//! of it at once may still strand non-redundant instances. This module
//! splits a class into reboot windows: for each window, every
//! non-redundant instance on its nodes can be parked simultaneously on
//! peers in the same cluster group. Each window is simulated from the
//! initial state — instances return to their original homes between
//! windows.

use tracing::debug;

use gridroll_cluster::{ClusterState, Ndx};

use crate::error::{PlanError, PlanResult};

/// One greedy pass: the subset of `group` whose non-redundant
/// instances can be evacuated together, with the simulated state after
/// those evacuations.
///
/// Walks `group` in order. A node that clears hands its shrunken target
/// set and updated state to the rest of the walk; a node that cannot
/// clear is skipped for this pass and left for a later window.
pub fn greedy_clear_nodes(
    group: &[Ndx],
    targets: &[Ndx],
    state: &ClusterState,
) -> PlanResult<(Vec<Ndx>, ClusterState)> {
    let Some((&ndx, rest)) = group.split_first() else {
        return Ok((Vec::new(), state.clone()));
    };

    let node = state.nodes.find(ndx)?;
    let othernodes: Vec<Ndx> = targets.iter().copied().filter(|&t| t != ndx).collect();
    let mut peers = Vec::new();
    for &t in &othernodes {
        if state.nodes.find(t)?.group == node.group {
            peers.push(t);
        }
    }

    let to_clear = state.non_redundant(ndx)?;
    match state.locate_instances(&to_clear, &peers) {
        Ok(cleared) => {
            let (mut subset, final_state) = greedy_clear_nodes(rest, &othernodes, &cleared)?;
            subset.insert(0, ndx);
            Ok((subset, final_state))
        }
        Err(err) => {
            debug!(node = %node.name, %err, "node cannot clear in this pass");
            greedy_clear_nodes(rest, targets, state)
        }
    }
}

/// Split a color class into reboot windows by evacuation capacity.
///
/// Loops `greedy_clear_nodes` over the not-yet-windowed remainder,
/// always simulating from the initial state. Fails with `NoCapacity`
/// when nodes remain but none of them can clear.
pub fn partition_non_redundant(
    group: &[Ndx],
    targets: &[Ndx],
    state: &ClusterState,
) -> PlanResult<Vec<(Vec<Ndx>, ClusterState)>> {
    let mut remaining: Vec<Ndx> = group.to_vec();
    let mut windows = Vec::new();

    while !remaining.is_empty() {
        let (cleared, simulated) = greedy_clear_nodes(&remaining, targets, state)?;
        if cleared.is_empty() {
            let node = state.nodes.find(remaining[0])?;
            return Err(PlanError::NoCapacity { node: node.name.clone() });
        }
        debug!(window = ?cleared, "evacuation window");
        remaining.retain(|n| !cleared.contains(n));
        windows.push((cleared, simulated));
    }

    Ok(windows)
}
