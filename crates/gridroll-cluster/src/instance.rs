//! Instance records.

use serde::{Deserialize, Serialize};

use crate::container::Element;
use crate::{Idx, Ndx};

/// A guest workload with a primary node and an optional secondary.
///
/// An instance with a secondary is *redundant*: its standby copy can
/// take over when the primary host goes down. Memory and disk are in
/// MiB, vCPUs are whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub idx: Idx,
    pub name: String,
    pub memory: i64,
    pub disk: i64,
    pub vcpus: i32,
    pub running: bool,
    /// Node currently hosting the instance.
    pub pnode: Ndx,
    /// Standby node, `None` for non-redundant instances.
    pub snode: Option<Ndx>,
}

impl Instance {
    /// Whether the instance has a valid standby copy.
    pub fn is_redundant(&self) -> bool {
        self.snode.is_some()
    }

    /// New value with the primary node rewritten.
    pub fn with_primary(&self, ndx: Ndx) -> Instance {
        Instance { pnode: ndx, ..self.clone() }
    }

    /// New value with the secondary node rewritten.
    pub fn with_secondary(&self, snode: Option<Ndx>) -> Instance {
        Instance { snode, ..self.clone() }
    }

    /// New value with both node references rewritten.
    pub fn with_nodes(&self, pnode: Ndx, snode: Option<Ndx>) -> Instance {
        Instance { pnode, snode, ..self.clone() }
    }
}

impl Element for Instance {
    const KIND: &'static str = "instance";

    fn idx(&self) -> i32 {
        self.idx
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_idx(&mut self, idx: i32) {
        self.idx = idx;
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_instance(idx: Idx, pnode: Ndx, snode: Option<Ndx>) -> Instance {
        Instance {
            idx,
            name: format!("inst{idx}"),
            memory: 1024,
            disk: 2048,
            vcpus: 2,
            running: true,
            pnode,
            snode,
        }
    }

    #[test]
    fn redundancy_follows_secondary() {
        assert!(make_instance(0, 1, Some(2)).is_redundant());
        assert!(!make_instance(0, 1, None).is_redundant());
    }

    #[test]
    fn setters_return_new_values() {
        let inst = make_instance(0, 1, Some(2));
        let moved = inst.with_primary(3);
        assert_eq!(inst.pnode, 1);
        assert_eq!(moved.pnode, 3);
        assert_eq!(moved.snode, Some(2));

        let swapped = inst.with_nodes(2, Some(1));
        assert_eq!(swapped.pnode, 2);
        assert_eq!(swapped.snode, Some(1));
    }
}
