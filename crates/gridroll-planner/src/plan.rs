//! Plan assembly — from snapshot to ordered reboot groups.

use std::cmp::Reverse;

use serde::Serialize;
use tracing::{info, trace, warn};

use gridroll_cluster::{ClusterData, ClusterState, Idx, Ndx, Node};
use gridroll_graph::{best_coloring, ColoringStats, ConflictGraph, GraphFlavor};

use crate::error::{PlanError, PlanResult};
use crate::evacuate::partition_non_redundant;
use crate::options::PlanOptions;

/// One reboot window: nodes going down together and the evacuation
/// moves that make it safe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebootGroup {
    pub nodes: Vec<Ndx>,
    /// `(instance, new primary node)`, ascending by instance index.
    pub moves: Vec<(Idx, Ndx)>,
}

/// How the winning coloring was chosen, for verbose reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStats {
    pub algorithm: &'static str,
    pub color_counts: Vec<ColoringStats>,
    pub vertex_count: usize,
    pub edge_count: usize,
}

/// The ordered reboot plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebootPlan {
    pub groups: Vec<RebootGroup>,
    pub stats: PlanStats,
}

/// Identify the master node, enforcing the exactly-one precondition.
fn find_master(state: &ClusterState, force: bool) -> PlanResult<Option<Ndx>> {
    let masters: Vec<&Node> = state.nodes.elems().filter(|n| n.master).collect();
    match masters.as_slice() {
        [] if force => {
            warn!("no master node in the cluster; skipping master-last ordering");
            Ok(None)
        }
        [] => Err(PlanError::NoMaster),
        [master] => Ok(Some(master.ndx)),
        many => Err(PlanError::MultipleMasters {
            names: many.iter().map(|n| n.name.clone()).collect(),
        }),
    }
}

/// The node indices planning operates on, after all filters.
fn filter_vertices(data: &ClusterData, opts: &PlanOptions) -> PlanResult<Vec<Ndx>> {
    let restrict = match &opts.group {
        Some(name) => Some(
            data.group_by_name(name)
                .ok_or_else(|| PlanError::UnknownGroup(name.clone()))?,
        ),
        None => None,
    };

    let mut vertices = Vec::new();
    for node in data.state.nodes.elems() {
        if node.offline {
            continue;
        }
        if let Some(gdx) = restrict {
            if node.group != gdx {
                continue;
            }
        }
        if !opts.node_tags.is_empty() && !node.has_any_tag(&opts.node_tags) {
            continue;
        }
        if opts.skip_non_redundant && !data.state.non_redundant(node.ndx)?.is_empty() {
            continue;
        }
        vertices.push(node.ndx);
    }
    Ok(vertices)
}

/// Compute the reboot plan for a cluster snapshot.
pub fn build_plan(data: &ClusterData, opts: &PlanOptions) -> PlanResult<RebootPlan> {
    let state = &data.state;
    let master = find_master(state, opts.force)?;

    let vertices = filter_vertices(data, opts)?;
    let flavor = if opts.offline_maintenance {
        GraphFlavor::AllInstance
    } else {
        GraphFlavor::Reboot
    };
    let graph = ConflictGraph::build(&vertices, &state.nodes, &state.instances, flavor)?;
    trace!(graph = ?graph, "conflict graph");

    let best = best_coloring(&graph);
    info!(
        algorithm = best.algorithm,
        colors = best.coloring.len(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "selected coloring"
    );

    // Split each color class into reboot windows sized by evacuation
    // capacity. Landing targets are every non-offline node; the
    // partitioner narrows them to same-group peers.
    let targets: Vec<Ndx> = state
        .nodes
        .elems()
        .filter(|n| !n.offline)
        .map(|n| n.ndx)
        .collect();

    let mut windows: Vec<(Vec<Ndx>, ClusterState)> = Vec::new();
    for class in best.coloring.values() {
        if opts.ignore_non_redundant {
            windows.push((class.clone(), state.clone()));
        } else {
            windows.extend(partition_non_redundant(class, &targets, state)?);
        }
    }

    windows.sort_by_key(|(nodes, _)| Reverse(nodes.len()));

    if let Some(master) = master {
        for (nodes, _) in &mut windows {
            if let Some(pos) = nodes.iter().position(|&n| n == master) {
                let ndx = nodes.remove(pos);
                nodes.push(ndx);
            }
        }
        if let Some(pos) = windows.iter().position(|(nodes, _)| nodes.contains(&master)) {
            let window = windows.remove(pos);
            windows.push(window);
        }
    }

    let mut groups = Vec::new();
    for (nodes, simulated) in windows {
        let mut moves = Vec::new();
        for inst in state.instances.elems() {
            let after = simulated.instances.find(inst.idx)?;
            if after.pnode != inst.pnode {
                moves.push((inst.idx, after.pnode));
            }
        }
        groups.push(RebootGroup { nodes, moves });
    }

    if opts.one_step_only {
        groups.truncate(1);
    }

    Ok(RebootPlan {
        groups,
        stats: PlanStats {
            algorithm: best.algorithm,
            color_counts: best.stats,
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
        },
    })
}
