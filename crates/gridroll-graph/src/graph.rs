//! Conflict graph construction.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use gridroll_cluster::{Container, Instance, Ndx, Node};

/// Result type alias for graph construction.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building the conflict graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("instance {instance} references an unknown node")]
    InvalidReference { instance: String },
}

/// Which instances force an edge between their primary and secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFlavor {
    /// Every redundant instance separates its two hosts. Used for
    /// offline maintenance, where even stopped instances must stay
    /// recoverable.
    AllInstance,
    /// Only running instances separate their hosts.
    Reboot,
}

/// Undirected conflict graph over node indices.
///
/// Symmetric, no self-loops; every vertex is present as a key even when
/// isolated. Adjacency is kept in ordered sets so traversal order — and
/// with it every downstream coloring — is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictGraph {
    adj: BTreeMap<Ndx, BTreeSet<Ndx>>,
}

impl ConflictGraph {
    /// Build the graph over `vertices` from the instance table.
    ///
    /// An edge joins an instance's primary and secondary when both lie
    /// in the vertex set (and, for the `Reboot` flavor, the instance is
    /// running). An instance pointing at a node absent from the node
    /// table is a fatal input error.
    pub fn build(
        vertices: &[Ndx],
        nodes: &Container<Node>,
        instances: &Container<Instance>,
        flavor: GraphFlavor,
    ) -> GraphResult<ConflictGraph> {
        let mut adj: BTreeMap<Ndx, BTreeSet<Ndx>> =
            vertices.iter().map(|&v| (v, BTreeSet::new())).collect();

        for inst in instances.elems() {
            if !nodes.contains(inst.pnode) {
                return Err(GraphError::InvalidReference { instance: inst.name.clone() });
            }
            let Some(snode) = inst.snode else { continue };
            if !nodes.contains(snode) {
                return Err(GraphError::InvalidReference { instance: inst.name.clone() });
            }
            if matches!(flavor, GraphFlavor::Reboot) && !inst.running {
                continue;
            }
            if inst.pnode == snode {
                continue;
            }
            if adj.contains_key(&inst.pnode) && adj.contains_key(&snode) {
                adj.entry(inst.pnode).or_default().insert(snode);
                adj.entry(snode).or_default().insert(inst.pnode);
            }
        }

        Ok(ConflictGraph { adj })
    }

    pub fn vertices(&self) -> impl Iterator<Item = Ndx> + '_ {
        self.adj.keys().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Neighbors of a vertex, ascending; empty for unknown vertices.
    pub fn neighbors(&self, v: Ndx) -> impl Iterator<Item = Ndx> + '_ {
        self.adj.get(&v).into_iter().flat_map(|s| s.iter().copied())
    }

    pub fn degree(&self, v: Ndx) -> usize {
        self.adj.get(&v).map_or(0, BTreeSet::len)
    }

    pub fn contains_edge(&self, u: Ndx, v: Ndx) -> bool {
        self.adj.get(&u).is_some_and(|s| s.contains(&v))
    }

    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeSet::len).sum::<usize>() / 2
    }
}
