use std::collections::BTreeSet;

use smart_filter::export::{DocumentOptions, ExportFormat, PDF_MIME, XLSX_MIME};
use smart_filter::ingestion::LoadOptions;
use smart_filter::pipeline::{
    candidate_values, load_prepared, load_prepared_bytes, run_pipeline, PipelineSummary,
    SubsetKind,
};
use smart_filter::processing::{
    distinct_values, narrow_candidates, partition, EmptySelection, FilterOptions, FilterSpec,
    KeywordClassifier,
};
use smart_filter::types::{DataSet, Value};
use smart_filter::SmartFilterError;

fn sales() -> DataSet {
    load_prepared(
        "tests/fixtures/sales.csv",
        &LoadOptions::default(),
        &KeywordClassifier::default(),
    )
    .unwrap()
}

fn column(ds: &DataSet, name: &str) -> Vec<String> {
    (0..ds.row_count())
        .map(|r| ds.value(r, name).unwrap().display().to_string())
        .collect()
}

#[test]
fn prepared_dataset_has_formatted_money_columns() {
    let ds = sales();
    assert_eq!(
        column(&ds, "net_amt"),
        vec!["1,234.50", "80.00", "1,000,000.00", "", "-42.10"]
    );
    assert_eq!(column(&ds, "vat"), vec!["86.42", "5.60", "70,000.00", "0.00", ""]);
    // Non-money columns keep their missing values.
    assert_eq!(ds.value(0, "note"), Some(&Value::Null));
}

#[test]
fn filtered_and_excluded_halves_cover_every_row_once() {
    let ds = sales();
    let specs = [
        FilterSpec::new(),
        FilterSpec::new().select("region", ["North"]),
        FilterSpec::new()
            .select("region", ["North", "South"])
            .select("product", ["Widget"]),
        FilterSpec::new().select("note", ["rush", "backorder"]),
        FilterSpec::new().select("region", ["West"]),
    ];

    for spec in &specs {
        let p = partition(&ds, spec, &FilterOptions::default()).unwrap();
        assert_eq!(p.total(), ds.row_count());

        let matched: BTreeSet<usize> = p.matched.iter().copied().collect();
        let excluded: BTreeSet<usize> = p.excluded.iter().copied().collect();
        assert!(matched.is_disjoint(&excluded));
        assert_eq!(matched.union(&excluded).count(), ds.row_count());

        assert!(p.matched.windows(2).all(|w| w[0] < w[1]));
        assert!(p.excluded.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn conjunction_across_columns() {
    let ds = sales();
    let spec = FilterSpec::new()
        .select("region", ["North", "South"])
        .select("product", ["Widget"]);
    let out = run_pipeline(&ds, &spec, &["invoice"], &FilterOptions::default()).unwrap();

    assert_eq!(column(&out.matched, "invoice"), vec!["INV-001", "INV-005"]);
    assert_eq!(
        column(&out.excluded, "invoice"),
        vec!["INV-002", "INV-003", "INV-004"]
    );
}

#[test]
fn empty_selection_policy_is_configurable() {
    let ds = sales();
    let spec = FilterSpec::new()
        .select("region", Vec::<String>::new())
        .select("product", ["Gadget"]);

    let nothing = run_pipeline(&ds, &spec, &["invoice"], &FilterOptions::default()).unwrap();
    assert_eq!(
        nothing.summary(),
        PipelineSummary {
            matched: 0,
            excluded: 5
        }
    );

    let opts = FilterOptions {
        empty_selection: EmptySelection::Unconstrained,
    };
    let ignored = run_pipeline(&ds, &spec, &["invoice"], &opts).unwrap();
    assert_eq!(column(&ignored.matched, "invoice"), vec!["INV-002"]);
}

#[test]
fn filter_spec_loads_from_json() {
    let ds = sales();
    let spec = FilterSpec::from_json(r#"{"region": ["East", "South"]}"#).unwrap();
    let out = run_pipeline(&ds, &spec, &["region", "invoice"], &FilterOptions::default()).unwrap();

    assert_eq!(out.matched.schema.columns, vec!["region", "invoice"]);
    assert_eq!(column(&out.matched, "invoice"), vec!["INV-002", "INV-004", "INV-005"]);
}

#[test]
fn unknown_filter_column_is_reported_with_available_columns() {
    let ds = sales();
    let spec = FilterSpec::new().select("country", ["NZ"]);
    let err = run_pipeline(&ds, &spec, &["invoice"], &FilterOptions::default()).unwrap_err();
    match err {
        SmartFilterError::UnknownColumn { column, available } => {
            assert_eq!(column, "country");
            assert!(available.contains(&"region".to_string()));
        }
        other => panic!("expected UnknownColumn, got {other}"),
    }
}

#[test]
fn candidate_values_are_narrowed_on_their_prefix() {
    let ds = sales();
    let values = distinct_values(&ds, "invoice").unwrap();
    assert_eq!(values.len(), 5);
    assert_eq!(narrow_candidates(&values, "inv").len(), 5);
    // "001" is beyond the first three characters.
    assert!(narrow_candidates(&values, "001").is_empty());

    let products = distinct_values(&ds, "product").unwrap();
    assert_eq!(products, vec!["Widget", "Gadget", "Gizmo"]);
    // "Widget" has its "g" past the prefix.
    assert_eq!(narrow_candidates(&products, "g"), vec!["Gadget", "Gizmo"]);
    assert_eq!(narrow_candidates(&products, "IZ"), vec!["Gizmo"]);
}

#[test]
fn candidate_values_cascade_from_earlier_selections() {
    let ds = sales();
    let opts = FilterOptions::default();

    let all = candidate_values(&ds, &FilterSpec::new(), "product", &opts).unwrap();
    assert_eq!(all, vec!["Widget", "Gadget", "Gizmo"]);

    let north = FilterSpec::new().select("region", ["North"]);
    assert_eq!(
        candidate_values(&ds, &north, "product", &opts).unwrap(),
        vec!["Widget", "Gizmo"]
    );

    let south_gadget = FilterSpec::new()
        .select("region", ["South"])
        .select("product", ["Gadget"]);
    // The product selection itself does not shrink the product list.
    assert_eq!(
        candidate_values(&ds, &south_gadget, "product", &opts).unwrap(),
        vec!["Gadget", "Widget"]
    );
    assert_eq!(
        candidate_values(&ds, &south_gadget, "invoice", &opts).unwrap(),
        vec!["INV-002"]
    );

    let nowhere = FilterSpec::new().select("region", ["West"]);
    assert!(candidate_values(&ds, &nowhere, "product", &opts)
        .unwrap()
        .is_empty());
}

#[test]
fn exports_carry_file_name_and_mime_type() {
    let ds = sales();
    let spec = FilterSpec::new().select("region", ["North"]);
    let out = run_pipeline(&ds, &spec, &["invoice", "net_amt"], &FilterOptions::default()).unwrap();
    let document = DocumentOptions::default();

    let pdf = out
        .export(SubsetKind::Filtered, ExportFormat::Pdf, &document)
        .unwrap();
    assert_eq!(pdf.file_name, "filtered_data.pdf");
    assert_eq!(pdf.mime_type, PDF_MIME);
    assert!(pdf.bytes.starts_with(b"%PDF-"));

    let xlsx = out
        .export(SubsetKind::Excluded, ExportFormat::Xlsx, &document)
        .unwrap();
    assert_eq!(xlsx.file_name, "excluded_data.xlsx");
    assert_eq!(xlsx.mime_type, XLSX_MIME);
    assert!(xlsx.bytes.starts_with(b"PK"));
}

#[test]
fn uploaded_bytes_are_prepared_like_files() {
    let bytes = std::fs::read("tests/fixtures/sales.csv").unwrap();
    let uploaded = load_prepared_bytes(
        "sales.csv",
        bytes,
        &LoadOptions::default(),
        &KeywordClassifier::default(),
    )
    .unwrap();
    assert_eq!(uploaded, sales());
}
