use thiserror::Error;

/// Convenience result type used across the crate.
pub type SmartFilterResult<T> = Result<T, SmartFilterError>;

/// Error type returned by loading, filtering, and export functions.
///
/// The `Display` output is the single human-readable message a shell shows to the user.
#[derive(Debug, Error)]
pub enum SmartFilterError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error (malformed record, invalid UTF-8, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook reading error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Spreadsheet export error.
    #[error("xlsx export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Document export error.
    #[error("pdf export error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Filter selection could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filter or display projection named a column the dataset does not have.
    #[error("unknown column '{column}'. columns={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// The requested workbook sheet does not exist.
    #[error("sheet '{sheet}' not found. sheets={available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// The input is structurally unusable (no header row, ragged record, unknown format, ...).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl SmartFilterError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
