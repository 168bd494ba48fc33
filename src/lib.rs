//! `smart-filter` loads a table (CSV or a workbook sheet), splits its rows into a **matched**
//! subset and an **excluded** subset by per-column value selections, and exports either half as
//! a paginated PDF or a single-sheet XLSX workbook.
//!
//! ## Pipeline
//!
//! 1. [`ingestion`]: CSV (UTF-8, optional BOM) and workbooks (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`,
//!    `.ods`) load into a [`types::DataSet`] whose cells are all text.
//! 2. [`processing::currency`]: money-looking columns are formatted as `1,234.50`. Which columns
//!    count as money is decided by a [`processing::ColumnClassifier`].
//! 3. [`processing::filter`]: a [`processing::FilterSpec`] (column -> permitted values) splits
//!    the rows; the excluded half is the complement by row position.
//! 4. [`processing::project`]: both halves keep only the display columns.
//! 5. [`export`]: PDF and XLSX encoders return byte buffers.
//!
//! [`pipeline`] ties the steps together for a shell.
//!
//! ## Example
//!
//! ```rust
//! use smart_filter::export::{DocumentOptions, ExportFormat};
//! use smart_filter::pipeline::{prepare, run_pipeline, SubsetKind};
//! use smart_filter::processing::{FilterOptions, FilterSpec, KeywordClassifier};
//! use smart_filter::types::{DataSet, Schema, Value};
//!
//! # fn main() -> Result<(), smart_filter::SmartFilterError> {
//! let raw = DataSet::new(
//!     Schema::new(["invoice", "region", "net_amt"]),
//!     vec![
//!         vec![Value::text("INV-1"), Value::text("North"), Value::text("1200")],
//!         vec![Value::text("INV-2"), Value::text("South"), Value::text("80.5")],
//!         vec![Value::text("INV-3"), Value::text("North"), Value::Null],
//!     ],
//! );
//! let ds = prepare(&raw, &KeywordClassifier::default());
//!
//! let spec = FilterSpec::new().select("region", ["North"]);
//! let out = run_pipeline(&ds, &spec, &["invoice", "net_amt"], &FilterOptions::default())?;
//! assert_eq!(out.summary().matched, 2);
//! assert_eq!(out.matched.rows[0][1], Value::text("1,200.00"));
//!
//! let pdf = out.export(SubsetKind::Excluded, ExportFormat::Pdf, &DocumentOptions::default())?;
//! assert_eq!(pdf.file_name, "excluded_data.pdf");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: load entrypoints, format detection, load observers
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: currency formatting, filtering, candidate search, projection
//! - [`export`]: PDF and XLSX encoders
//! - [`pipeline`]: the shell-facing pipeline
//! - [`error`]: the crate error type

pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{SmartFilterError, SmartFilterResult};
