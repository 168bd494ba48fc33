//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::{DataSet, Value};

use super::cells::{schema_from_headers, NaValues};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have a header row; it becomes the schema (blank/duplicate names are made unique).
/// - Every value is kept as text. Cells equal to an NA token load as [`Value::Null`].
/// - Records shorter than the header are padded with nulls; longer records are an error.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, na: &NaValues) -> SmartFilterResult<DataSet> {
    let bytes = std::fs::read(path)?;
    ingest_csv_from_bytes(&bytes, na)
}

/// Ingest CSV data held in memory (e.g. an uploaded file). A leading UTF-8 BOM is skipped.
pub fn ingest_csv_from_bytes(bytes: &[u8], na: &NaValues) -> SmartFilterResult<DataSet> {
    let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);
    ingest_csv_from_reader(&mut rdr, na)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be configured with `has_headers(true)`; `flexible(true)` is needed for
/// short records to be padded rather than rejected by the reader itself.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    na: &NaValues,
) -> SmartFilterResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(SmartFilterError::invalid("csv has no header row"));
    }
    let schema = schema_from_headers(headers.iter());
    let width = schema.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        if record.len() > width {
            return Err(SmartFilterError::invalid(format!(
                "row {user_row} has {} fields but the header has {width}",
                record.len()
            )));
        }

        let mut row: Vec<Value> = record.iter().map(|raw| na.to_value(raw)).collect();
        row.resize(width, Value::Null);
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = width, "csv ingested");
    Ok(DataSet::new(schema, rows))
}
