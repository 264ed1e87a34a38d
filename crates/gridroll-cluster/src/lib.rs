//! gridroll-cluster — the in-memory cluster model.
//!
//! Everything the planner knows about a cluster lives in two ordered,
//! integer-indexed containers: one for nodes (physical hosts) and one
//! for instances (guest workloads). Cross-entity references are plain
//! indices, never owning handles, so the whole state is a cheap-to-clone
//! value that planning passes thread through as they simulate moves.
//!
//! # Components
//!
//! - **`container`** — `Element` capability trait and the ordered
//!   index→entity `Container`
//! - **`node`** — `Node` records and capacity-checked placement
//! - **`instance`** — `Instance` records and redundancy
//! - **`state`** — `ClusterState` plus the relocation primitives
//!   (`move_instance`, `locate_instance`, `locate_instances`)
//! - **`error`** — typed failures (`NotFound`, `NoCapacity`, ...)

pub mod container;
pub mod error;
pub mod instance;
pub mod node;
pub mod state;

pub use container::{Container, Element};
pub use error::{ClusterError, ClusterResult};
pub use instance::Instance;
pub use node::{CapacityFail, Node};
pub use state::{ClusterData, ClusterState};

/// Node index. Dense small integers assigned by the loader.
pub type Ndx = i32;

/// Instance index.
pub type Idx = i32;

/// Cluster group index.
pub type Gdx = i32;
