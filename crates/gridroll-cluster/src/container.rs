//! Ordered index→entity containers.
//!
//! Nodes and instances share a small capability set (a stable integer
//! index and a human name); `Container` is generic over it. Backing
//! storage is a `BTreeMap` so enumeration is always in index order —
//! the planner's determinism leans on that.
//!
//! Containers have value semantics: `add`/`add_two` consume the
//! container and return the updated one. Planning code clones the
//! state it starts from and threads the new value forward.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, ClusterResult};

/// Capability shared by every entity a `Container` can hold.
pub trait Element {
    /// Entity kind used in diagnostics ("node", "instance").
    const KIND: &'static str;

    fn idx(&self) -> i32;
    fn name(&self) -> &str;
    fn set_idx(&mut self, idx: i32);
    fn set_name(&mut self, name: String);
}

/// Ordered map from integer index to entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container<T: Element> {
    items: BTreeMap<i32, T>,
}

impl<T: Element> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Container<T> {
    pub fn new() -> Self {
        Self { items: BTreeMap::new() }
    }

    /// Build a container from entities, keyed by each entity's own index.
    pub fn from_elems(elems: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: elems.into_iter().map(|e| (e.idx(), e)).collect(),
        }
    }

    /// Look up an entity, failing with `NotFound` if absent.
    pub fn find(&self, idx: i32) -> ClusterResult<&T> {
        self.items.get(&idx).ok_or(ClusterError::NotFound { kind: T::KIND, idx })
    }

    pub fn contains(&self, idx: i32) -> bool {
        self.items.contains_key(&idx)
    }

    /// Insert or replace an entity, keyed by its own index.
    pub fn add(mut self, item: T) -> Self {
        self.items.insert(item.idx(), item);
        self
    }

    /// Insert or replace two entities in one step.
    pub fn add_two(self, a: T, b: T) -> Self {
        self.add(a).add(b)
    }

    /// Indices in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.items.keys().copied()
    }

    /// Entities in ascending index order.
    pub fn elems(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// First entity with the given name, if any.
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.items.values().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
