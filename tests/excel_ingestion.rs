use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use smart_filter::ingestion::excel::{
    ingest_excel_from_bytes, ingest_excel_from_path, list_sheets_from_path,
};
use smart_filter::ingestion::{NaValues, DEFAULT_NA_VALUES};
use smart_filter::types::Value;
use smart_filter::SmartFilterError;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("smart-filter-{name}-{nanos}.xlsx"))
}

fn default_na() -> NaValues {
    NaValues::new(DEFAULT_NA_VALUES.iter().copied())
}

fn write_orders_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();

    // Orders: header on row 3 after a blank row and a title row.
    let ws1 = wb.add_worksheet();
    ws1.set_name("Orders").unwrap();
    ws1.write_string(0, 0, "Quarterly orders").unwrap();
    ws1.write_string(2, 0, "order_id").unwrap();
    ws1.write_string(2, 1, "customer").unwrap();
    ws1.write_string(2, 2, "total").unwrap();
    ws1.write_string(2, 3, "paid").unwrap();

    ws1.write_number(3, 0, 1001).unwrap();
    ws1.write_string(3, 1, "Ada").unwrap();
    ws1.write_number(3, 2, 98.5).unwrap();
    ws1.write_boolean(3, 3, true).unwrap();

    // row 4 is left empty

    ws1.write_number(5, 0, 1002).unwrap();
    ws1.write_string(5, 1, "NA").unwrap();
    ws1.write_number(5, 2, 87).unwrap();
    ws1.write_boolean(5, 3, false).unwrap();

    // Customers: second sheet
    let ws2 = wb.add_worksheet();
    ws2.set_name("Customers").unwrap();
    ws2.write_string(0, 0, "name").unwrap();
    ws2.write_string(0, 1, "tier").unwrap();
    ws2.write_string(1, 0, "Ada").unwrap();
    ws2.write_string(1, 1, "gold").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn list_sheets_in_workbook_order() {
    let path = tmp_file("sheets");
    write_orders_xlsx(&path);

    let sheets = list_sheets_from_path(&path).unwrap();
    assert_eq!(sheets, vec!["Orders".to_string(), "Customers".to_string()]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_first_sheet_by_default() {
    let path = tmp_file("first");
    write_orders_xlsx(&path);

    let ds = ingest_excel_from_path(&path, None, &default_na()).unwrap();
    assert_eq!(
        ds.schema.columns,
        vec!["Quarterly orders", "Unnamed: 1", "Unnamed: 2", "Unnamed: 3"]
    );
    // The blank rows between the title and the data stay as missing rows.
    assert_eq!(ds.row_count(), 5);
    assert_eq!(ds.rows[0], vec![Value::Null; 4]);
    assert_eq!(ds.rows[1][0], Value::text("order_id"));
    assert_eq!(ds.rows[3], vec![Value::Null; 4]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_named_sheet_renders_cells_as_text() {
    let path = tmp_file("named");
    write_orders_xlsx(&path);

    let ds = ingest_excel_from_path(&path, Some("Customers"), &default_na()).unwrap();
    assert_eq!(ds.schema.columns, vec!["name", "tier"]);
    assert_eq!(ds.rows, vec![vec![Value::text("Ada"), Value::text("gold")]]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn numbers_and_booleans_read_back_as_display_text() {
    let mut wb = rust_xlsxwriter::Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "order_id").unwrap();
    ws.write_string(0, 1, "customer").unwrap();
    ws.write_string(0, 2, "total").unwrap();
    ws.write_string(0, 3, "paid").unwrap();
    ws.write_number(1, 0, 1001).unwrap();
    ws.write_string(1, 1, "NA").unwrap();
    ws.write_number(1, 2, 98.5).unwrap();
    ws.write_boolean(1, 3, false).unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let ds = ingest_excel_from_bytes(bytes, None, &default_na()).unwrap();
    assert_eq!(
        ds.rows[0],
        vec![
            Value::text("1001"),
            Value::Null,
            Value::text("98.5"),
            Value::text("False"),
        ]
    );
}

#[test]
fn ingest_skips_leading_empty_rows_and_keeps_interior_ones() {
    let mut wb = rust_xlsxwriter::Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(2, 0, "id").unwrap();
    ws.write_number(3, 0, 1).unwrap();
    ws.write_number(5, 0, 2).unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let ds = ingest_excel_from_bytes(bytes, None, &default_na()).unwrap();
    assert_eq!(ds.schema.columns, vec!["id"]);
    assert_eq!(
        ds.rows,
        vec![
            vec![Value::text("1")],
            vec![Value::Null],
            vec![Value::text("2")]
        ]
    );
}

#[test]
fn blank_cells_after_the_last_value_extend_the_rows() {
    let mut wb = rust_xlsxwriter::Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(1, 0, "a").unwrap();
    ws.write_blank(3, 0, &rust_xlsxwriter::Format::new()).unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let ds = ingest_excel_from_bytes(bytes, None, &default_na()).unwrap();
    assert_eq!(
        ds.rows,
        vec![vec![Value::text("a")], vec![Value::Null], vec![Value::Null]]
    );
}

#[test]
fn date_cells_load_as_timestamps() {
    use rust_xlsxwriter::{ExcelDateTime, Format};

    let mut wb = rust_xlsxwriter::Workbook::new();
    let ws = wb.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    ws.write_string(0, 0, "invoice").unwrap();
    ws.write_string(0, 1, "issued").unwrap();
    ws.write_string(1, 0, "INV-001").unwrap();
    let issued = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
    ws.write_datetime_with_format(1, 1, &issued, &date_format)
        .unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let ds = ingest_excel_from_bytes(bytes, None, &default_na()).unwrap();
    assert_eq!(ds.value(0, "issued"), Some(&Value::text("2024-03-15 00:00:00")));
}

#[test]
fn ingest_errors_on_missing_sheet() {
    let path = tmp_file("missing-sheet");
    write_orders_xlsx(&path);

    let err = ingest_excel_from_path(&path, Some("Nope"), &default_na()).unwrap_err();
    match err {
        SmartFilterError::SheetNotFound { sheet, available } => {
            assert_eq!(sheet, "Nope");
            assert_eq!(available, vec!["Orders".to_string(), "Customers".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_errors_on_empty_sheet() {
    let mut wb = rust_xlsxwriter::Workbook::new();
    wb.add_worksheet().set_name("Blank").unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let err = ingest_excel_from_bytes(bytes, None, &default_na()).unwrap_err();
    assert!(err.to_string().contains("no header row found"));
}
