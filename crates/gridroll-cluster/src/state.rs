//! Cluster state and the instance relocation primitives.
//!
//! `ClusterState` is a pure value: every relocation returns a new state
//! and leaves the input untouched. The planner exploits this to
//! simulate evacuations speculatively and discard the ones that don't
//! work out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::container::Container;
use crate::error::{ClusterError, ClusterResult};
use crate::instance::Instance;
use crate::node::Node;
use crate::{Gdx, Idx, Ndx};

/// The node and instance tables threaded through planning operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    pub nodes: Container<Node>,
    pub instances: Container<Instance>,
}

/// A full cluster snapshot as produced by the loader.
///
/// Cluster tags are carried for the driver's benefit; the planner does
/// not interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterData {
    /// Group index → group name.
    pub groups: BTreeMap<Gdx, String>,
    pub state: ClusterState,
    pub tags: Vec<String>,
}

impl ClusterData {
    /// Resolve a cluster group by name.
    pub fn group_by_name(&self, name: &str) -> Option<Gdx> {
        self.groups
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&gdx, _)| gdx)
    }
}

impl ClusterState {
    /// The node's primary instances that have no standby copy.
    pub fn non_redundant(&self, ndx: Ndx) -> ClusterResult<Vec<Idx>> {
        let node = self.nodes.find(ndx)?;
        let mut out = Vec::new();
        for &idx in &node.primary {
            if !self.instances.find(idx)?.is_redundant() {
                out.push(idx);
            }
        }
        Ok(out)
    }

    /// Move an instance to a new primary node.
    ///
    /// Resources are debited on the target with force, so soft capacity
    /// limits don't block a simulated evacuation; hard limits (memory,
    /// disk) still do. Moving an instance onto its current primary is a
    /// successful no-op.
    pub fn move_instance(&self, idx: Idx, to: Ndx) -> ClusterResult<ClusterState> {
        let inst = self.instances.find(idx)?.clone();
        if inst.pnode == to {
            return Ok(self.clone());
        }

        let from_node = self.nodes.find(inst.pnode)?;
        let to_node = self.nodes.find(to)?;

        let to_node = to_node.add_primary(&inst, true).map_err(|fail| {
            ClusterError::Placement {
                instance: inst.name.clone(),
                node: to_node.name.clone(),
                fail,
            }
        })?;
        let from_node = from_node.remove_primary(&inst);
        let moved = inst.with_primary(to);

        debug!(instance = %moved.name, from = from_node.ndx, to, "relocated instance");

        Ok(ClusterState {
            nodes: self.nodes.clone().add_two(from_node, to_node),
            instances: self.instances.clone().add(moved),
        })
    }

    /// Place an instance on the first candidate node that accepts it.
    pub fn locate_instance(&self, idx: Idx, candidates: &[Ndx]) -> ClusterResult<ClusterState> {
        let inst = self.instances.find(idx)?;
        for &ndx in candidates {
            match self.move_instance(idx, ndx) {
                Ok(state) => return Ok(state),
                Err(err) => {
                    trace!(instance = %inst.name, node = ndx, %err, "candidate rejected");
                }
            }
        }
        Err(ClusterError::NoCapacity { instance: inst.name.clone() })
    }

    /// Place a list of instances, threading the state through.
    ///
    /// Fails on the first instance no candidate can take.
    pub fn locate_instances(
        &self,
        idxs: &[Idx],
        candidates: &[Ndx],
    ) -> ClusterResult<ClusterState> {
        let mut state = self.clone();
        for &idx in idxs {
            state = state.locate_instance(idx, candidates)?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::node::CapacityFail;

    fn make_node(ndx: Ndx, free_mem: i64) -> Node {
        Node {
            ndx,
            name: format!("node{ndx}"),
            group: 0,
            primary: Vec::new(),
            secondary: Vec::new(),
            free_memory: free_mem,
            total_memory: 8192,
            free_disk: 65536,
            total_disk: 65536,
            free_vcpus: 16,
            total_vcpus: 16,
            offline: false,
            master: false,
            tags: BTreeSet::new(),
        }
    }

    fn make_instance(idx: Idx, memory: i64, pnode: Ndx) -> Instance {
        Instance {
            idx,
            name: format!("inst{idx}"),
            memory,
            disk: 1024,
            vcpus: 1,
            running: true,
            pnode,
            snode: None,
        }
    }

    /// One instance on node 0, nodes 1 and 2 empty.
    fn small_state() -> ClusterState {
        let inst = make_instance(0, 1024, 0);
        let mut host = make_node(0, 4096);
        host.primary.push(0);
        host.free_memory -= inst.memory;
        ClusterState {
            nodes: Container::from_elems([host, make_node(1, 4096), make_node(2, 512)]),
            instances: Container::from_elems([inst]),
        }
    }

    #[test]
    fn move_updates_both_nodes_and_instance() {
        let state = small_state();
        let moved = state.move_instance(0, 1).unwrap();

        assert_eq!(moved.instances.find(0).unwrap().pnode, 1);
        assert!(moved.nodes.find(0).unwrap().primary.is_empty());
        assert_eq!(moved.nodes.find(1).unwrap().primary, vec![0]);
        assert_eq!(moved.nodes.find(0).unwrap().free_memory, 4096);
        assert_eq!(moved.nodes.find(1).unwrap().free_memory, 3072);
        // Input state untouched.
        assert_eq!(state.instances.find(0).unwrap().pnode, 0);
    }

    #[test]
    fn move_to_current_primary_is_noop() {
        let state = small_state();
        let moved = state.move_instance(0, 0).unwrap();
        assert_eq!(moved, state);
    }

    #[test]
    fn move_to_unknown_node_fails() {
        let state = small_state();
        assert_eq!(
            state.move_instance(0, 9),
            Err(ClusterError::NotFound { kind: "node", idx: 9 })
        );
    }

    #[test]
    fn move_fails_hard_on_exhausted_memory() {
        let state = small_state();
        let err = state.move_instance(0, 2).unwrap_err();
        assert_eq!(
            err,
            ClusterError::Placement {
                instance: "inst0".to_string(),
                node: "node2".to_string(),
                fail: CapacityFail::Memory,
            }
        );
    }

    #[test]
    fn locate_takes_first_fitting_candidate() {
        let state = small_state();
        // Node 2 lacks memory, node 1 fits.
        let placed = state.locate_instance(0, &[2, 1]).unwrap();
        assert_eq!(placed.instances.find(0).unwrap().pnode, 1);
    }

    #[test]
    fn locate_fails_with_no_capacity_when_all_reject() {
        let state = small_state();
        assert_eq!(
            state.locate_instance(0, &[2]),
            Err(ClusterError::NoCapacity { instance: "inst0".to_string() })
        );
    }

    #[test]
    fn locate_instances_threads_state() {
        let inst_a = make_instance(0, 2048, 0);
        let inst_b = make_instance(1, 2048, 0);
        let mut host = make_node(0, 8192);
        host.primary = vec![0, 1];
        host.free_memory -= 4096;
        // Target only fits one of the two.
        let state = ClusterState {
            nodes: Container::from_elems([host, make_node(1, 2048)]),
            instances: Container::from_elems([inst_a, inst_b]),
        };

        assert!(state.locate_instances(&[0], &[1]).is_ok());
        assert_eq!(
            state.locate_instances(&[0, 1], &[1]),
            Err(ClusterError::NoCapacity { instance: "inst1".to_string() })
        );
    }

    #[test]
    fn non_redundant_filters_by_secondary() {
        let mut state = small_state();
        let redundant = make_instance(1, 512, 0).with_secondary(Some(1));
        let mut host = state.nodes.find(0).unwrap().clone();
        host.primary.push(1);
        state.nodes = state.nodes.add(host);
        state.instances = state.instances.add(redundant);

        assert_eq!(state.non_redundant(0).unwrap(), vec![0]);
    }

    #[test]
    fn group_lookup_by_name() {
        let data = ClusterData {
            groups: BTreeMap::from([(0, "default".to_string()), (1, "rack-b".to_string())]),
            state: small_state(),
            tags: Vec::new(),
        };
        assert_eq!(data.group_by_name("rack-b"), Some(1));
        assert_eq!(data.group_by_name("rack-z"), None);
    }
}
