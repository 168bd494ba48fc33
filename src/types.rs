//! Core data model types.
//!
//! Every loader produces a [`DataSet`]: an ordered list of column names (the [`Schema`]) plus
//! row-major [`Value`] storage. All cells are text; there is no type inference on ingest.

use std::collections::HashSet;

/// Ordered, unique column names describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of column names.
    pub columns: Vec<String>,
}

impl Schema {
    /// Create a new schema from column names.
    ///
    /// Callers are expected to pass unique names; the loaders in [`crate::ingestion`]
    /// de-duplicate header cells before building a schema.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A single cell in a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Missing value (empty cell or NA token on ingest).
    Null,
    /// Text value, kept exactly as read.
    Text(String),
}

impl Value {
    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Borrow the text, or `None` for [`Value::Null`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.as_str()),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Display text; missing values render as the empty string.
    pub fn display(&self) -> &str {
        self.as_str().unwrap_or("")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] columns. Row order
/// is meaningful: the position of a row is its identity for
/// [`crate::processing::filter::partition`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly one value per schema column.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let width = schema.len();
        for (idx, row) in rows.iter().enumerate() {
            assert!(
                row.len() == width,
                "row {idx} has {} values but schema has {width} columns",
                row.len()
            );
        }
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Returns `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow a cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.schema.index_of(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Create a new dataset containing the rows at `indices`, in the given order.
    ///
    /// Out-of-range indices are skipped.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset by applying `mapper` to every cell of the columns selected by
    /// `select`. Other columns are copied unchanged.
    pub fn map_columns<P, F>(&self, mut select: P, mut mapper: F) -> Self
    where
        P: FnMut(&str) -> bool,
        F: FnMut(&Value) -> Value,
    {
        let selected: HashSet<usize> = self
            .schema
            .column_names()
            .enumerate()
            .filter(|(_, name)| select(name))
            .map(|(idx, _)| idx)
            .collect();
        if selected.is_empty() {
            return self.clone();
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, v)| {
                        if selected.contains(&idx) {
                            mapper(v)
                        } else {
                            v.clone()
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }
}
