//! Command handlers for the CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use smart_filter::export::{DocumentOptions, ExportFormat, FontSource};
use smart_filter::ingestion::{list_sheets, LoadOptions, SheetSelection, TracingObserver};
use smart_filter::pipeline::{
    candidate_values, load_prepared, run_pipeline, PipelineSummary, SubsetKind,
};
use smart_filter::processing::{narrow_candidates, FilterOptions, FilterSpec, KeywordClassifier};

use crate::cli::{FilterArgs, OutputFormatArg, SheetsArgs, SplitArgs, ValuesArgs};

/// Print one sheet name per line. CSV files have none.
pub fn run_sheets(args: &SheetsArgs) -> Result<()> {
    let sheets = list_sheets(&args.file)
        .with_context(|| format!("list sheets of {}", args.file.display()))?;
    for sheet in sheets {
        println!("{sheet}");
    }
    Ok(())
}

/// Print the distinct values of a column among the rows that pass the earlier selections,
/// narrowed by the search text.
pub fn run_values(args: &ValuesArgs) -> Result<()> {
    let dataset = load_prepared(
        &args.file,
        &load_options(args.sheet.as_deref()),
        &KeywordClassifier::default(),
    )
    .with_context(|| format!("load {}", args.file.display()))?;
    let spec = filter_spec(&args.filter)?;
    let values = candidate_values(&dataset, &spec, &args.column, &filter_options(&args.filter))?;
    for value in narrow_candidates(&values, &args.search) {
        println!("{value}");
    }
    Ok(())
}

/// Run the full pipeline and write the non-empty halves to the output directory.
pub fn run_split(args: &SplitArgs) -> Result<PipelineSummary> {
    let dataset = load_prepared(
        &args.file,
        &load_options(args.sheet.as_deref()),
        &KeywordClassifier::default(),
    )
    .with_context(|| format!("load {}", args.file.display()))?;

    let spec = filter_spec(&args.filter)?;
    let columns: Vec<String> = if args.columns.is_empty() {
        dataset.schema.columns.clone()
    } else {
        args.columns.clone()
    };
    let output = run_pipeline(&dataset, &spec, &columns, &filter_options(&args.filter))?;
    let summary = output.summary();

    let document = DocumentOptions {
        font: args
            .font
            .clone()
            .map_or(FontSource::Builtin, FontSource::TrueTypeFile),
        repeat_header: args.repeat_header,
        ..DocumentOptions::default()
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory {}", args.out_dir.display()))?;
    for kind in [SubsetKind::Filtered, SubsetKind::Excluded] {
        if output.subset(kind).is_empty() {
            continue;
        }
        for format in formats(args.format) {
            let artifact = output.export(kind, *format, &document)?;
            let path = args.out_dir.join(&artifact.file_name);
            write_file(&path, &artifact.bytes)?;
            info!(path = %path.display(), bytes = artifact.bytes.len(), "wrote export");
        }
    }
    Ok(summary)
}

fn load_options(sheet: Option<&str>) -> LoadOptions {
    LoadOptions {
        sheet: sheet.map_or(SheetSelection::First, |s| SheetSelection::Named(s.to_string())),
        observer: Some(Arc::new(TracingObserver)),
        ..LoadOptions::default()
    }
}

/// `--filter-file` first, then every `--filter` on top of it.
fn filter_spec(args: &FilterArgs) -> Result<FilterSpec> {
    let mut spec = match &args.filter_file {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read filter file {}", path.display()))?;
            FilterSpec::from_json(&json)
                .with_context(|| format!("parse filter file {}", path.display()))?
        }
        None => FilterSpec::new(),
    };
    for (column, values) in &args.filters {
        spec.insert(column.clone(), values.iter().cloned());
    }
    Ok(spec)
}

fn filter_options(args: &FilterArgs) -> FilterOptions {
    FilterOptions {
        empty_selection: args.empty_selection.into(),
    }
}

fn formats(arg: OutputFormatArg) -> &'static [ExportFormat] {
    match arg {
        OutputFormatArg::Pdf => &[ExportFormat::Pdf],
        OutputFormatArg::Xlsx => &[ExportFormat::Xlsx],
        OutputFormatArg::Both => &[ExportFormat::Pdf, ExportFormat::Xlsx],
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}
