//! Cluster snapshot loading.
//!
//! The snapshot is a JSON document listing groups, nodes, and
//! instances. DTOs mirror the file; `build_cluster` validates every
//! cross-reference and assembles the planner's `ClusterData`, deriving
//! per-node instance lists from the instances' own placement fields so
//! the two can never disagree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use gridroll_cluster::{
    ClusterData, ClusterState, Container, Gdx, Idx, Instance, Ndx, Node,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDto {
    pub groups: Vec<GroupDto>,
    pub nodes: Vec<NodeDto>,
    pub instances: Vec<InstanceDto>,
    #[serde(default)]
    pub cluster_tags: Vec<String>,
    /// Instance policy blob, carried for other tooling; the planner
    /// does not interpret it.
    #[serde(default)]
    pub instance_policy: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDto {
    pub idx: Gdx,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDto {
    pub idx: Ndx,
    pub name: String,
    pub group: Gdx,
    /// Memory and disk in MiB, as reported by the host.
    pub total_memory: i64,
    pub free_memory: i64,
    pub total_disk: i64,
    pub free_disk: i64,
    pub total_vcpus: i32,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub master: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDto {
    pub idx: Idx,
    pub name: String,
    pub memory: i64,
    pub disk: i64,
    pub vcpus: i32,
    #[serde(default = "default_running")]
    pub running: bool,
    pub pnode: Ndx,
    #[serde(default)]
    pub snode: Option<Ndx>,
}

fn default_running() -> bool {
    true
}

/// Read and validate a snapshot file.
pub fn load_snapshot(path: &Path) -> anyhow::Result<ClusterData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let dto: SnapshotDto = serde_json::from_str(&content)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    build_cluster(dto)
}

/// Assemble `ClusterData` from the raw DTOs.
pub fn build_cluster(dto: SnapshotDto) -> anyhow::Result<ClusterData> {
    let mut groups: BTreeMap<Gdx, String> = BTreeMap::new();
    for g in &dto.groups {
        if groups.insert(g.idx, g.name.clone()).is_some() {
            bail!("duplicate group index {}", g.idx);
        }
    }

    let mut nodes: BTreeMap<Ndx, Node> = BTreeMap::new();
    let mut node_names: BTreeSet<String> = BTreeSet::new();
    for n in &dto.nodes {
        if !groups.contains_key(&n.group) {
            bail!("node {} references unknown group {}", n.name, n.group);
        }
        if !node_names.insert(n.name.clone()) {
            bail!("duplicate node name {}", n.name);
        }
        let node = Node {
            ndx: n.idx,
            name: n.name.clone(),
            group: n.group,
            primary: Vec::new(),
            secondary: Vec::new(),
            free_memory: n.free_memory,
            total_memory: n.total_memory,
            free_disk: n.free_disk,
            total_disk: n.total_disk,
            free_vcpus: n.total_vcpus,
            total_vcpus: n.total_vcpus,
            offline: n.offline,
            master: n.master,
            tags: n.tags.clone(),
        };
        if nodes.insert(n.idx, node).is_some() {
            bail!("duplicate node index {}", n.idx);
        }
    }

    let mut instances: BTreeMap<Idx, Instance> = BTreeMap::new();
    let mut instance_names: BTreeSet<String> = BTreeSet::new();
    for i in &dto.instances {
        if !instance_names.insert(i.name.clone()) {
            bail!("duplicate instance name {}", i.name);
        }
        if !nodes.contains_key(&i.pnode) {
            bail!("instance {} references unknown primary node {}", i.name, i.pnode);
        }
        if let Some(snode) = i.snode {
            if !nodes.contains_key(&snode) {
                bail!("instance {} references unknown secondary node {}", i.name, snode);
            }
            if snode == i.pnode {
                bail!("instance {} has identical primary and secondary node", i.name);
            }
        }

        let inst = Instance {
            idx: i.idx,
            name: i.name.clone(),
            memory: i.memory,
            disk: i.disk,
            vcpus: i.vcpus,
            running: i.running,
            pnode: i.pnode,
            snode: i.snode,
        };
        if instances.insert(i.idx, inst).is_some() {
            bail!("duplicate instance index {}", i.idx);
        }
    }

    // Derive the per-node instance lists and vCPU accounting from the
    // instances' own placement; memory and disk are host-reported.
    for inst in instances.values() {
        if let Some(node) = nodes.get_mut(&inst.pnode) {
            node.primary.push(inst.idx);
            node.free_vcpus -= inst.vcpus;
        }
        if let Some(snode) = inst.snode {
            if let Some(node) = nodes.get_mut(&snode) {
                node.secondary.push(inst.idx);
            }
        }
    }

    Ok(ClusterData {
        groups,
        state: ClusterState {
            nodes: Container::from_elems(nodes.into_values()),
            instances: Container::from_elems(instances.into_values()),
        },
        tags: dto.cluster_tags,
    })
}
