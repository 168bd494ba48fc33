//! Per-column value selection and the matched/excluded partition.
//!
//! A [`FilterSpec`] maps column names to the set of values the user selected for that column.
//! [`partition`] returns the row indices that satisfy every active column (AND semantics) and
//! the complement, both in original row order. Row identity is the row's position, so duplicate
//! rows are kept apart.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::{DataSet, Value};

/// Column name -> permitted values.
///
/// Columns that are not present impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    columns: BTreeMap<String, HashSet<String>>,
}

impl FilterSpec {
    /// An empty spec: every row matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the permitted values for `column`, replacing any previous selection.
    pub fn select<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(column, values);
        self
    }

    /// In-place form of [`Self::select`].
    pub fn insert<I, S>(&mut self, column: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .insert(column.into(), values.into_iter().map(Into::into).collect());
    }

    /// Drop the selection for `column`.
    pub fn remove(&mut self, column: &str) -> Option<HashSet<String>> {
        self.columns.remove(column)
    }

    /// Permitted values for `column`, if it is filtered.
    pub fn permitted(&self, column: &str) -> Option<&HashSet<String>> {
        self.columns.get(column)
    }

    /// Iterate `(column, permitted values)` in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no column is filtered.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Decode a selection from JSON: `{"COLUMN": ["v1", "v2"]}`.
    pub fn from_json(json: &str) -> SmartFilterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What a column with an empty permitted set means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptySelection {
    /// The column matches nothing, so the matched subset is empty (default).
    #[default]
    MatchNothing,
    /// The column is ignored, as if it were absent from the spec.
    Unconstrained,
}

/// Options controlling [`partition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Meaning of a column whose permitted set is empty.
    pub empty_selection: EmptySelection,
}

/// Row indices of the matched and excluded subsets, each in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Rows that satisfy every active filter.
    pub matched: Vec<usize>,
    /// All other rows.
    pub excluded: Vec<usize>,
}

impl Partition {
    /// Total number of rows covered (matched + excluded).
    pub fn total(&self) -> usize {
        self.matched.len() + self.excluded.len()
    }
}

/// Split `dataset` row indices into matched and excluded.
///
/// A row is matched when, for every active column of `spec`, its value is a member of that
/// column's permitted set. Missing values never match. Every filtered column must exist in
/// `dataset`.
pub fn partition(
    dataset: &DataSet,
    spec: &FilterSpec,
    options: &FilterOptions,
) -> SmartFilterResult<Partition> {
    let mut active: Vec<(usize, &HashSet<String>)> = Vec::with_capacity(spec.len());
    let mut match_nothing = false;
    for (column, permitted) in spec.iter() {
        let idx = dataset
            .schema
            .index_of(column)
            .ok_or_else(|| SmartFilterError::UnknownColumn {
                column: column.to_owned(),
                available: dataset.schema.columns.clone(),
            })?;
        if permitted.is_empty() {
            match options.empty_selection {
                EmptySelection::MatchNothing => match_nothing = true,
                EmptySelection::Unconstrained => {}
            }
            continue;
        }
        active.push((idx, permitted));
    }

    let mut out = Partition {
        matched: Vec::new(),
        excluded: Vec::new(),
    };
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        let keep = !match_nothing
            && active.iter().all(|(col, permitted)| match &row[*col] {
                Value::Text(s) => permitted.contains(s),
                Value::Null => false,
            });
        if keep {
            out.matched.push(row_idx);
        } else {
            out.excluded.push(row_idx);
        }
    }

    tracing::debug!(
        rows = dataset.row_count(),
        active_columns = active.len(),
        match_nothing,
        matched = out.matched.len(),
        excluded = out.excluded.len(),
        "partitioned dataset"
    );
    Ok(out)
}

/// [`partition`] and materialize both halves as new datasets `(matched, excluded)`.
pub fn split(
    dataset: &DataSet,
    spec: &FilterSpec,
    options: &FilterOptions,
) -> SmartFilterResult<(DataSet, DataSet)> {
    let p = partition(dataset, spec, options)?;
    Ok((dataset.take_rows(&p.matched), dataset.take_rows(&p.excluded)))
}
