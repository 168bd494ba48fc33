//! Load entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] or [`ingest_from_bytes`] (from [`unified`])
//! which:
//!
//! - auto-detect the format by file extension (or you can override via [`LoadOptions`])
//! - load into an in-memory [`crate::types::DataSet`] with every cell kept as text
//! - optionally report success/failure/alerts to a [`LoadObserver`]
//!
//! Format-specific functions are also available under [`csv`] and [`excel`].

pub mod cells;
pub mod csv;
pub mod excel;
pub mod observability;
pub mod unified;

pub use cells::{NaValues, DEFAULT_NA_VALUES};
pub use observability::{
    CompositeObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver,
};
pub use unified::{
    ingest_from_bytes, ingest_from_path, list_sheets, InputFormat, LoadOptions, SheetSelection,
};
