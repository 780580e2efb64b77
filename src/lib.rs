//! Declarative UI composition engine.
//!
//! Application code builds a tree of layouts and items describing a page
//! without writing HTML; a [`Displayer`] serializes that tree into the
//! mapping a template renderer consumes, tracks the CSS/JS/CDN assets the
//! used component kinds require, and resolves how each TABLE layout's data
//! reaches the client (plain markup, client-side enhanced, bulk JSON, or a
//! server-side endpoint).

pub mod displayer;
pub mod error;
pub mod graph;
pub mod item;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod resources;

pub use displayer::showcase::build_showcase;
pub use displayer::{Breadcrumb, Displayer, DisplayerConfig, ModuleSpec};
pub use error::{DisplayError, Result};
pub use graph::{LayoutGraph, LayoutId};
pub use item::{
    AlertSeverity, ChartFlavor, ChartSeries, Item, ItemCategory, ItemKind, ItemPayload,
};
pub use layout::{
    Alignment, Cell, ColumnBinding, Columns, GridArea, GridConfig, Layout, LayoutKind,
    TableConfig, TableMode,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, event_with_fields, json_kv,
};
pub use metrics::{CompositionMetrics, MetricSnapshot};
pub use resources::{ResourceRegistry, ResourceSet};
