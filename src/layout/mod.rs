//! Layout module orchestrator following the RSB module specification.
//!
//! Downstream code imports layout types from here while the implementation
//! details live in the private `core` module.

mod core;
pub mod grid;
pub mod table;

pub use core::{Alignment, Cell, Columns, Layout, LayoutKind};
pub use grid::{GridArea, GridConfig};
pub use table::{ColumnBinding, TableConfig, TableMode};
