use smart_filter::ingestion::{
    ingest_from_bytes, ingest_from_path, list_sheets, InputFormat, LoadOptions, SheetSelection,
};
use smart_filter::types::Value;

fn write_regions_workbook() -> Vec<u8> {
    let mut wb = rust_xlsxwriter::Workbook::new();
    let north = wb.add_worksheet();
    north.set_name("North").unwrap();
    north.write_string(0, 0, "store").unwrap();
    north.write_string(1, 0, "N-1").unwrap();
    let south = wb.add_worksheet();
    south.set_name("South").unwrap();
    south.write_string(0, 0, "store").unwrap();
    south.write_string(1, 0, "S-1").unwrap();
    south.write_string(2, 0, "S-2").unwrap();
    wb.save_to_buffer().unwrap()
}

#[test]
fn ingest_from_path_infers_csv() {
    let ds = ingest_from_path("tests/fixtures/sales.csv", &LoadOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 5);
    assert_eq!(ds.column_count(), 6);
}

#[test]
fn ingest_from_path_with_explicit_format_ignores_extension() {
    let dir = std::env::temp_dir().join(format!("smart-filter-explicit-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("export.dat");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let opts = LoadOptions {
        format: Some(InputFormat::Csv),
        ..Default::default()
    };
    let ds = ingest_from_path(&path, &opts).unwrap();
    assert_eq!(ds.rows, vec![vec![Value::text("1"), Value::text("2")]]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ingest_from_path_rejects_unknown_extension() {
    let err =
        ingest_from_path("tests/fixtures/sales.parquet", &LoadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("cannot infer format from extension 'parquet'"));
}

#[test]
fn ingest_from_bytes_reads_uploaded_workbook_sheet() {
    let opts = LoadOptions {
        sheet: SheetSelection::Named("South".to_string()),
        ..Default::default()
    };
    let ds = ingest_from_bytes("stores.xlsx", write_regions_workbook(), &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.value(1, "store"), Some(&Value::text("S-2")));
}

#[test]
fn ingest_from_bytes_reads_uploaded_csv_with_bom() {
    let bytes = b"\xEF\xBB\xBFregion,net\nNorth,10\n".to_vec();
    let ds = ingest_from_bytes("upload.CSV", bytes, &LoadOptions::default()).unwrap();
    assert_eq!(ds.schema.columns, vec!["region", "net"]);
}

#[test]
fn custom_na_values_replace_the_defaults() {
    let bytes = b"code\nNA\n\n-\n".to_vec();
    let opts = LoadOptions {
        na_values: vec!["-".to_string()],
        ..Default::default()
    };
    let ds = ingest_from_bytes("codes.csv", bytes, &opts).unwrap();
    assert_eq!(ds.rows, vec![vec![Value::text("NA")], vec![Value::Null]]);
}

#[test]
fn list_sheets_of_csv_is_empty() {
    assert!(list_sheets("tests/fixtures/sales.csv").unwrap().is_empty());
}
