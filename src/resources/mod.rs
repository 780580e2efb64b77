//! Resource registry orchestrator following the RSB module specification.
//!
//! Downstream code imports resource types from here while the implementation
//! details live in the private `core` module.

mod core;

pub use core::{ResourceRegistry, ResourceSet};
