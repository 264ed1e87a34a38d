//! Node records and capacity-checked instance placement.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::container::Element;
use crate::instance::Instance;
use crate::{Gdx, Idx, Ndx};

/// Why a placement on a node was rejected.
///
/// Memory, disk, and duplicate placement are hard failures in every
/// mode. vCPU oversubscription is soft: forced placement accepts it and
/// lets `free_vcpus` go negative, which evacuation simulation relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityFail {
    #[error("insufficient free memory")]
    Memory,

    #[error("insufficient free disk")]
    Disk,

    #[error("vcpus oversubscribed")]
    Cpu,

    #[error("instance already placed on node")]
    Duplicate,
}

/// A physical host in the cluster.
///
/// `primary` and `secondary` list the instances hosted here by role.
/// Free memory/disk are as reported by the host, in MiB; they are
/// signed so simulated (forced) placement can oversubscribe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub ndx: Ndx,
    pub name: String,
    /// Cluster group membership. Evacuations never cross groups.
    pub group: Gdx,
    /// Instances with this node as primary.
    pub primary: Vec<Idx>,
    /// Instances with this node as secondary.
    pub secondary: Vec<Idx>,
    pub free_memory: i64,
    pub total_memory: i64,
    pub free_disk: i64,
    pub total_disk: i64,
    pub free_vcpus: i32,
    pub total_vcpus: i32,
    pub offline: bool,
    pub master: bool,
    pub tags: BTreeSet<String>,
}

impl Node {
    /// Place an instance as primary, debiting resources.
    ///
    /// Returns the updated node. Fails hard when free memory or disk
    /// would go negative or the instance is already placed here; fails
    /// soft (`Cpu`, bypassed by `force`) on vCPU oversubscription.
    pub fn add_primary(&self, inst: &Instance, force: bool) -> Result<Node, CapacityFail> {
        if self.primary.contains(&inst.idx) {
            return Err(CapacityFail::Duplicate);
        }

        let free_memory = self.free_memory - inst.memory;
        let free_disk = self.free_disk - inst.disk;
        let free_vcpus = self.free_vcpus - inst.vcpus;

        if free_memory < 0 {
            return Err(CapacityFail::Memory);
        }
        if free_disk < 0 {
            return Err(CapacityFail::Disk);
        }
        if free_vcpus < 0 && !force {
            return Err(CapacityFail::Cpu);
        }

        let mut node = self.clone();
        node.primary.push(inst.idx);
        node.free_memory = free_memory;
        node.free_disk = free_disk;
        node.free_vcpus = free_vcpus;
        Ok(node)
    }

    /// Remove a primary instance, crediting resources back.
    ///
    /// Infallible: removing an instance that is not present returns the
    /// node unchanged.
    pub fn remove_primary(&self, inst: &Instance) -> Node {
        if !self.primary.contains(&inst.idx) {
            return self.clone();
        }

        let mut node = self.clone();
        node.primary.retain(|&idx| idx != inst.idx);
        node.free_memory += inst.memory;
        node.free_disk += inst.disk;
        node.free_vcpus += inst.vcpus;
        node
    }

    /// Whether the node carries any tag from the given set.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

impl Element for Node {
    const KIND: &'static str = "node";

    fn idx(&self) -> i32 {
        self.ndx
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_idx(&mut self, idx: i32) {
        self.ndx = idx;
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_node(ndx: Ndx, free_mem: i64, free_disk: i64, free_vcpus: i32) -> Node {
        Node {
            ndx,
            name: format!("node{ndx}"),
            group: 0,
            primary: Vec::new(),
            secondary: Vec::new(),
            free_memory: free_mem,
            total_memory: 8192,
            free_disk,
            total_disk: 65536,
            free_vcpus,
            total_vcpus: 16,
            offline: false,
            master: false,
            tags: BTreeSet::new(),
        }
    }

    fn make_instance(idx: Idx, memory: i64, disk: i64, vcpus: i32) -> Instance {
        Instance {
            idx,
            name: format!("inst{idx}"),
            memory,
            disk,
            vcpus,
            running: true,
            pnode: 0,
            snode: None,
        }
    }

    #[test]
    fn add_primary_debits_resources() {
        let node = make_node(0, 4096, 10240, 8);
        let inst = make_instance(0, 1024, 2048, 2);

        let node = node.add_primary(&inst, false).unwrap();
        assert_eq!(node.primary, vec![0]);
        assert_eq!(node.free_memory, 3072);
        assert_eq!(node.free_disk, 8192);
        assert_eq!(node.free_vcpus, 6);
    }

    #[test]
    fn add_primary_rejects_exhausted_memory() {
        let node = make_node(0, 512, 10240, 8);
        let inst = make_instance(0, 1024, 2048, 2);

        assert_eq!(node.add_primary(&inst, false), Err(CapacityFail::Memory));
        // Memory is a hard constraint; force does not bypass it.
        assert_eq!(node.add_primary(&inst, true), Err(CapacityFail::Memory));
    }

    #[test]
    fn add_primary_rejects_exhausted_disk() {
        let node = make_node(0, 4096, 1024, 8);
        let inst = make_instance(0, 1024, 2048, 2);

        assert_eq!(node.add_primary(&inst, false), Err(CapacityFail::Disk));
        assert_eq!(node.add_primary(&inst, true), Err(CapacityFail::Disk));
    }

    #[test]
    fn force_allows_cpu_oversubscription() {
        let node = make_node(0, 4096, 10240, 1);
        let inst = make_instance(0, 1024, 2048, 4);

        assert_eq!(node.add_primary(&inst, false), Err(CapacityFail::Cpu));

        let forced = node.add_primary(&inst, true).unwrap();
        assert_eq!(forced.free_vcpus, -3);
    }

    #[test]
    fn duplicate_placement_rejected_even_forced() {
        let node = make_node(0, 4096, 10240, 8);
        let inst = make_instance(0, 1024, 2048, 2);

        let node = node.add_primary(&inst, false).unwrap();
        assert_eq!(node.add_primary(&inst, true), Err(CapacityFail::Duplicate));
    }

    #[test]
    fn remove_primary_credits_back() {
        let node = make_node(0, 4096, 10240, 8);
        let inst = make_instance(0, 1024, 2048, 2);

        let placed = node.add_primary(&inst, false).unwrap();
        let removed = placed.remove_primary(&inst);
        assert_eq!(removed, node);
    }

    #[test]
    fn remove_primary_of_absent_instance_is_noop() {
        let node = make_node(0, 4096, 10240, 8);
        let inst = make_instance(9, 1024, 2048, 2);

        assert_eq!(node.remove_primary(&inst), node);
    }
}
