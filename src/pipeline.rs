//! The end-to-end pipeline a shell drives on every interaction.
//!
//! `load -> normalize -> partition -> project -> export`, as plain functions over owned or
//! borrowed values. There is no session state here: a shell keeps the prepared [`DataSet`] and
//! calls [`run_pipeline`] again whenever the selections change. A call either returns a complete
//! [`PipelineOutput`] or an error, never a partial result.

use std::path::Path;

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::export::{
    render_document, render_spreadsheet, DocumentOptions, ExportArtifact, ExportFormat,
};
use crate::ingestion::{ingest_from_bytes, ingest_from_path, LoadOptions};
use crate::processing::{
    distinct_values, normalize_currency_columns, partition, project, ColumnClassifier,
    FilterOptions, FilterSpec,
};
use crate::types::DataSet;

/// Which half of a partition an export is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsetKind {
    /// Rows that satisfy the filter.
    Filtered,
    /// Rows that do not.
    Excluded,
}

impl SubsetKind {
    /// Document title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Filtered => "Filtered Data (Table 1)",
            Self::Excluded => "Excluded Data (Table 2)",
        }
    }

    /// Worksheet name.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Filtered => "FilteredData",
            Self::Excluded => "ExcludedData",
        }
    }

    /// Download file name for `format`, e.g. `filtered_data.pdf`.
    pub fn file_name(self, format: ExportFormat) -> String {
        let kind = match self {
            Self::Filtered => "filtered",
            Self::Excluded => "excluded",
        };
        format!("{kind}_data.{}", format.extension())
    }
}

/// Row counts of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Rows in the matched subset.
    pub matched: usize,
    /// Rows in the excluded subset.
    pub excluded: usize,
}

/// Matched and excluded subsets, already projected to the display columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Rows that satisfy the filter.
    pub matched: DataSet,
    /// All other rows.
    pub excluded: DataSet,
}

impl PipelineOutput {
    /// Borrow one half.
    pub fn subset(&self, kind: SubsetKind) -> &DataSet {
        match kind {
            SubsetKind::Filtered => &self.matched,
            SubsetKind::Excluded => &self.excluded,
        }
    }

    /// Row counts of both halves.
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            matched: self.matched.row_count(),
            excluded: self.excluded.row_count(),
        }
    }

    /// Encode one half for download.
    pub fn export(
        &self,
        kind: SubsetKind,
        format: ExportFormat,
        document: &DocumentOptions,
    ) -> SmartFilterResult<ExportArtifact> {
        let data = self.subset(kind);
        let bytes = match format {
            ExportFormat::Pdf => render_document(data, kind.title(), document)?,
            ExportFormat::Xlsx => render_spreadsheet(data, kind.sheet_name())?,
        };
        Ok(ExportArtifact {
            file_name: kind.file_name(format),
            mime_type: format.mime_type(),
            bytes,
        })
    }
}

/// Format the currency columns of a freshly loaded dataset.
pub fn prepare(raw: &DataSet, classifier: &dyn ColumnClassifier) -> DataSet {
    normalize_currency_columns(raw, classifier)
}

/// Load a file from disk and [`prepare`] it.
pub fn load_prepared(
    path: impl AsRef<Path>,
    options: &LoadOptions,
    classifier: &dyn ColumnClassifier,
) -> SmartFilterResult<DataSet> {
    let raw = ingest_from_path(path, options)?;
    Ok(prepare(&raw, classifier))
}

/// Load an in-memory upload and [`prepare`] it.
pub fn load_prepared_bytes(
    file_name: &str,
    bytes: Vec<u8>,
    options: &LoadOptions,
    classifier: &dyn ColumnClassifier,
) -> SmartFilterResult<DataSet> {
    let raw = ingest_from_bytes(file_name, bytes, options)?;
    Ok(prepare(&raw, classifier))
}

/// Partition `dataset` by `spec` and project both halves to `display_columns`.
///
/// All column names are validated before any work is done. An empty `display_columns` is
/// rejected: there would be nothing to show or export.
pub fn run_pipeline<S: AsRef<str>>(
    dataset: &DataSet,
    spec: &FilterSpec,
    display_columns: &[S],
    options: &FilterOptions,
) -> SmartFilterResult<PipelineOutput> {
    if display_columns.is_empty() {
        return Err(SmartFilterError::invalid("no display columns selected"));
    }

    let p = partition(dataset, spec, options)?;
    let matched = project(&dataset.take_rows(&p.matched), display_columns)?;
    let excluded = project(&dataset.take_rows(&p.excluded), display_columns)?;

    tracing::info!(
        matched = matched.row_count(),
        excluded = excluded.row_count(),
        columns = display_columns.len(),
        "pipeline finished"
    );
    Ok(PipelineOutput { matched, excluded })
}

/// Values offered for `column` once the other selections in `spec` are applied.
///
/// Selections cascade: the candidates come from the rows that satisfy every other column, so
/// after `region = North` a product list only offers products sold in the North. A selection on
/// `column` itself is ignored.
pub fn candidate_values(
    dataset: &DataSet,
    spec: &FilterSpec,
    column: &str,
    options: &FilterOptions,
) -> SmartFilterResult<Vec<String>> {
    let mut others = spec.clone();
    others.remove(column);
    let p = partition(dataset, &others, options)?;
    let values = distinct_values(&dataset.take_rows(&p.matched), column)?;
    tracing::debug!(
        column,
        rows = p.matched.len(),
        candidates = values.len(),
        "candidate values listed"
    );
    Ok(values)
}
