//! Workbook ingestion (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) via calamine.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets, XlsxError};

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::{DataSet, Value};

use super::cells::{schema_from_headers, NaValues};

/// List sheet names of a workbook on disk, in workbook order.
pub fn list_sheets_from_path(path: impl AsRef<Path>) -> SmartFilterResult<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_vec())
}

/// List sheet names of a workbook held in memory.
pub fn list_sheets_from_bytes(bytes: Vec<u8>) -> SmartFilterResult<Vec<String>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Ingest one sheet of a workbook on disk into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows as text; empty rows inside the sheet's used range load as all-missing
///   rows
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    na: &NaValues,
) -> SmartFilterResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    ingest_workbook(&mut workbook, sheet_name, na)
}

/// Ingest one sheet of a workbook held in memory (e.g. an uploaded file).
pub fn ingest_excel_from_bytes(
    bytes: Vec<u8>,
    sheet_name: Option<&str>,
    na: &NaValues,
) -> SmartFilterResult<DataSet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    ingest_workbook(&mut workbook, sheet_name, na)
}

fn ingest_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet_name: Option<&str>,
    na: &NaValues,
) -> SmartFilterResult<DataSet> {
    let names = workbook.sheet_names().to_vec();
    let sheet = match sheet_name {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| SmartFilterError::SheetNotFound {
                sheet: wanted.to_owned(),
                available: names.clone(),
            })?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| SmartFilterError::invalid("workbook has no sheets"))?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    let last_row = declared_last_row(workbook, &sheet)?;
    let ds = ingest_sheet_range(&sheet, &range, last_row, na)?;
    tracing::debug!(
        sheet = %sheet,
        rows = ds.row_count(),
        columns = ds.column_count(),
        "sheet ingested"
    );
    Ok(ds)
}

/// Last row of the used range an `.xlsx` sheet declares in its `<dimension>` element.
///
/// calamine builds ranges from non-empty cells only, so blank cells written after the last value
/// are visible here and nowhere else.
fn declared_last_row<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet: &str,
) -> SmartFilterResult<Option<u32>> {
    match workbook {
        Sheets::Xlsx(xlsx) => match xlsx.worksheet_cells_reader(sheet) {
            Ok(reader) => Ok(Some(reader.dimensions().end.0)),
            Err(XlsxError::NotAWorksheet(_)) => Ok(None),
            Err(e) => Err(calamine::Error::Xlsx(e).into()),
        },
        _ => Ok(None),
    }
}

fn ingest_sheet_range(
    sheet: &str,
    range: &calamine::Range<Data>,
    declared_last_row: Option<u32>,
    na: &NaValues,
) -> SmartFilterResult<DataSet> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| {
            SmartFilterError::invalid(format!(
                "sheet '{sheet}' has no non-empty rows (no header row found)"
            ))
        })?;

    let mut rows_iter = range.rows().skip(header_row_idx);
    let header_cells: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let schema = schema_from_headers(&header_cells);
    let width = schema.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in rows_iter {
        let mut out_row: Vec<Value> = row
            .iter()
            .take(width)
            .map(|c| match c {
                Data::Empty => Value::Null,
                other => na.to_value(&cell_text(other)),
            })
            .collect();
        out_row.resize(width, Value::Null);
        rows.push(out_row);
    }

    // Blank rows after the last value still belong to the sheet when its dimension says so.
    if let (Some(declared), Some((last, _))) = (declared_last_row, range.end()) {
        let trailing = declared.saturating_sub(last) as usize;
        rows.extend(std::iter::repeat_n(vec![Value::Null; width], trailing));
    }

    Ok(DataSet::new(schema, rows))
}

/// Render a workbook cell as text.
///
/// Integral floats print without a fractional part (`3.0` -> `"3"`), which is how numeric ids
/// and amounts typed into a spreadsheet are expected to read back. Date cells print as
/// `YYYY-MM-DD HH:MM:SS`, time-only cells as `HH:MM:SS`.
fn cell_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            // A serial below one day is a time of day without a date.
            Some(naive) if dt.as_f64() < 1.0 => naive.format("%H:%M:%S").to_string(),
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use calamine::{Data, ExcelDateTime, ExcelDateTimeType};

    use super::cell_text;

    #[test]
    fn integral_floats_drop_fraction() {
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(98.5)), "98.5");
        assert_eq!(cell_text(&Data::Float(-1234.0)), "-1234");
    }

    #[test]
    fn booleans_and_strings_render_as_text() {
        assert_eq!(cell_text(&Data::Bool(true)), "True");
        assert_eq!(cell_text(&Data::String("x y".to_string())), "x y");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn date_cells_render_as_timestamps() {
        let date = ExcelDateTime::new(45366.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(date)), "2024-03-15 00:00:00");

        let noon = ExcelDateTime::new(45366.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(noon)), "2024-03-15 12:00:00");

        let time_only = ExcelDateTime::new(0.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(time_only)), "18:00:00");
    }
}
