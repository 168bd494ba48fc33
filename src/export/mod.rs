//! Export encoders: paginated PDF ([`document`]) and single-sheet XLSX ([`spreadsheet`]).
//!
//! Both encoders are pure functions from a [`crate::types::DataSet`] to an in-memory byte
//! buffer; nothing is written to disk.

pub mod document;
pub mod spreadsheet;

use std::fmt;

pub use document::{render_document, DocumentOptions, FontSource, TextFitter, UnsupportedGlyphs};
pub use spreadsheet::render_spreadsheet;

/// MIME type of exported documents.
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of exported spreadsheets.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Output encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Paginated PDF table.
    Pdf,
    /// XLSX workbook with one sheet.
    Xlsx,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME type for downloads.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Xlsx => XLSX_MIME,
        }
    }
}

/// An encoded export ready to be offered for download.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, `<kind>_data.<ext>`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Encoded file content.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}
