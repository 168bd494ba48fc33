//! Single-sheet XLSX export.

use rust_xlsxwriter::{Format, Workbook};

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::DataSet;

/// Maximum number of data rows (below the header) in one worksheet.
pub const MAX_DATA_ROWS: usize = 1_048_575;
/// Maximum number of columns in one worksheet.
pub const MAX_COLUMNS: usize = 16_384;

const MAX_SHEET_NAME_CHARS: usize = 31;
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Serialize `dataset` as an XLSX workbook with a single sheet named `sheet_name`.
///
/// Row 1 holds the column names; data rows follow in order. Every cell is written as a string
/// (no type coercion); missing and empty values are written as blank cells, so a row with no
/// text still counts toward the sheet's used range.
pub fn render_spreadsheet(dataset: &DataSet, sheet_name: &str) -> SmartFilterResult<Vec<u8>> {
    if dataset.row_count() > MAX_DATA_ROWS {
        return Err(SmartFilterError::invalid(format!(
            "{} rows exceed the worksheet limit of {MAX_DATA_ROWS}",
            dataset.row_count()
        )));
    }
    if dataset.column_count() > MAX_COLUMNS {
        return Err(SmartFilterError::invalid(format!(
            "{} columns exceed the worksheet limit of {MAX_COLUMNS}",
            dataset.column_count()
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sanitize_sheet_name(sheet_name))?;

    for (col, name) in dataset.schema.column_names().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    let blank = Format::new();
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            match value.as_str() {
                Some(s) if !s.is_empty() => {
                    worksheet.write_string(excel_row, col as u16, s)?;
                }
                _ => {
                    worksheet.write_blank(excel_row, col as u16, &blank)?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(
        sheet = sheet_name,
        rows = dataset.row_count(),
        bytes = bytes.len(),
        "spreadsheet rendered"
    );
    Ok(bytes)
}

/// Make `name` acceptable as a worksheet name: forbidden characters become `_`, the result is
/// cut to 31 characters, surrounding apostrophes are removed, and an empty result falls back to
/// `Sheet1`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_sheet_name;

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sanitize_sheet_name("FilteredData"), "FilteredData");
        assert_eq!(sanitize_sheet_name("Q1/Q2 [draft]"), "Q1_Q2 _draft_");
        assert_eq!(sanitize_sheet_name(""), "Sheet1");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).chars().count(), 31);
    }
}
