//! Item model orchestrator following the RSB module specification.
//!
//! Downstream code imports item types from here while the implementation
//! details live in the private `core` module.

mod core;

pub use core::{AlertSeverity, ChartFlavor, ChartSeries, Item, ItemCategory, ItemKind, ItemPayload};
