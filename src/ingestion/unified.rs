//! Unified load entrypoints.
//!
//! Most callers should use [`ingest_from_path`] or, for uploads held in memory,
//! [`ingest_from_bytes`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::DataSet;

use super::cells::{NaValues, DEFAULT_NA_VALUES};
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};
use super::{csv, excel};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values (UTF-8, optional BOM).
    Csv,
    /// Spreadsheet/workbook formats read through calamine.
    Excel,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format from a path or file name.
    pub fn from_path(path: &Path) -> SmartFilterResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).ok_or_else(|| {
            SmartFilterError::invalid(format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ))
        })?;

        Self::from_extension(ext).ok_or_else(|| {
            SmartFilterError::invalid(format!(
                "cannot infer format from extension '{ext}' for path ({})",
                path.display()
            ))
        })
    }
}

/// Which workbook sheet to load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// The first sheet in workbook order (default).
    #[default]
    First,
    /// A single named sheet.
    Named(String),
}

impl SheetSelection {
    fn as_name(&self) -> Option<&str> {
        match self {
            Self::First => None,
            Self::Named(name) => Some(name.as_str()),
        }
    }
}

/// Options controlling load behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<InputFormat>,
    /// Sheet to read from a workbook. Ignored for CSV.
    pub sheet: SheetSelection,
    /// Cell texts that load as missing values.
    pub na_values: Vec<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("sheet", &self.sheet)
            .field("na_values", &self.na_values.len())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet: SheetSelection::default(),
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoadOptions {
    fn na(&self) -> NaValues {
        NaValues::new(self.na_values.iter().cloned())
    }
}

/// Load a file from disk into a [`DataSet`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use smart_filter::ingestion::{ingest_from_path, LoadOptions, SheetSelection};
///
/// # fn main() -> Result<(), smart_filter::SmartFilterError> {
/// let opts = LoadOptions {
///     sheet: SheetSelection::Named("Invoices".to_string()),
///     ..Default::default()
/// };
/// let ds = ingest_from_path("ledger.xlsx", &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> SmartFilterResult<DataSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => InputFormat::from_path(path)?,
    };
    let ctx = LoadContext {
        source: path.display().to_string(),
        format,
    };

    let na = options.na();
    let result = match format {
        InputFormat::Csv => csv::ingest_csv_from_path(path, &na),
        InputFormat::Excel => excel::ingest_excel_from_path(path, options.sheet.as_name(), &na),
    };
    report(options, &ctx, result)
}

/// Load an in-memory upload into a [`DataSet`].
///
/// `file_name` is only used to infer the format (when `options.format` is `None`) and for
/// observer context.
pub fn ingest_from_bytes(
    file_name: &str,
    bytes: Vec<u8>,
    options: &LoadOptions,
) -> SmartFilterResult<DataSet> {
    let format = match options.format {
        Some(f) => f,
        None => InputFormat::from_path(Path::new(file_name))?,
    };
    let ctx = LoadContext {
        source: file_name.to_owned(),
        format,
    };

    let na = options.na();
    let result = match format {
        InputFormat::Csv => csv::ingest_csv_from_bytes(&bytes, &na),
        InputFormat::Excel => excel::ingest_excel_from_bytes(bytes, options.sheet.as_name(), &na),
    };
    report(options, &ctx, result)
}

/// List the sheets of a workbook on disk. CSV files have a single implicit sheet and are
/// reported as an empty list.
pub fn list_sheets(path: impl AsRef<Path>) -> SmartFilterResult<Vec<String>> {
    let path = path.as_ref();
    match InputFormat::from_path(path)? {
        InputFormat::Csv => Ok(Vec::new()),
        InputFormat::Excel => excel::list_sheets_from_path(path),
    }
}

fn report(
    options: &LoadOptions,
    ctx: &LoadContext,
    result: SmartFilterResult<DataSet>,
) -> SmartFilterResult<DataSet> {
    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(
                ctx,
                LoadStats {
                    rows: ds.row_count(),
                    columns: ds.column_count(),
                },
            ),
            Err(e) => {
                let sev = LoadSeverity::for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }
    result
}
