//! gridroll-cli — snapshot loading and plan rendering for the
//! `gridroll` binary.
//!
//! The planning core lives in `gridroll-planner`; this crate owns the
//! file format and the presentation.

pub mod loader;
pub mod report;
