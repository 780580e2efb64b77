use thiserror::Error;

use crate::graph::LayoutId;

/// Unified result type for the displayer crate.
pub type Result<T> = std::result::Result<T, DisplayError>;

/// Errors surfaced by the composition engine.
///
/// Construction errors are raised by constructors, addressing errors at the
/// offending call site. Serialization itself is infallible once construction
/// and addressing invariants hold.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("column widths {0:?} must sum to 12")]
    InvalidColumns(Vec<u8>),
    #[error("layout requires at least one column")]
    EmptyColumns,
    #[error("grid slot `{slot}` exceeds the 12-unit row: x {x} + w {w} > 12")]
    InvalidGridArea { slot: String, x: u8, w: u8 },
    #[error("grid slot `{0}` is already placed")]
    DuplicateGridSlot(String),
    #[error("grid slot `{slot}` overlaps slot `{other}`")]
    GridOverlap { slot: String, other: String },
    #[error("{got} alignment entries do not match {expected} columns")]
    AlignmentMismatch { expected: usize, got: usize },
    #[error("invalid table config: {0}")]
    InvalidTableConfig(String),
    #[error("layout carries both legacy and current table configs")]
    ConflictingTableConfig,
    #[error("invalid item: {0}")]
    InvalidItem(String),
    #[error("layout `{0}` not found")]
    LayoutNotFound(LayoutId),
    #[error("column {column} out of range for a layout with {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },
    #[error("layout `{0}` is frozen")]
    FrozenLayout(LayoutId),
    #[error("cell ({column}, {line}) already holds {held}")]
    CellOccupied {
        column: usize,
        line: usize,
        held: &'static str,
    },
    #[error("spacer layouts accept no content")]
    SpacerContent,
    #[error("no module opened; call add_module first")]
    NoCurrentModule,
    #[error("no layout registered yet; pass an explicit layout id")]
    NoCurrentLayout,
    #[error("displayer already serialized; further mutation is rejected")]
    AlreadyDisplayed,
}
