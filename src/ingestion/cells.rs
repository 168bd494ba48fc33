//! Shared cell and header handling for the CSV and workbook loaders.

use std::collections::{HashMap, HashSet};

use crate::types::{Schema, Value};

/// Tokens that load as [`Value::Null`] unless overridden via
/// [`super::LoadOptions::na_values`].
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Lookup set of NA tokens.
#[derive(Debug, Clone, Default)]
pub struct NaValues {
    tokens: HashSet<String>,
}

impl NaValues {
    /// Build from a list of tokens. The empty string is always treated as missing.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: HashSet<String> = tokens.into_iter().map(Into::into).collect();
        tokens.insert(String::new());
        Self { tokens }
    }

    /// Returns `true` if `raw` should load as a missing value.
    pub fn is_na(&self, raw: &str) -> bool {
        self.tokens.contains(raw)
    }

    /// Convert raw text into a [`Value`].
    pub fn to_value(&self, raw: &str) -> Value {
        if self.is_na(raw) {
            Value::Null
        } else {
            Value::Text(raw.to_owned())
        }
    }
}

/// Build a [`Schema`] from raw header cells.
///
/// Blank names become `Unnamed: <index>`; repeated names get `.1`, `.2`, ... suffixes so the
/// resulting column names are unique.
pub fn schema_from_headers<I, S>(headers: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = h.as_ref();
            if h.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                h.to_owned()
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(raw.len());
    for name in raw {
        if seen.insert(name.clone()) {
            columns.push(name);
            continue;
        }
        let counter = next_suffix.entry(name.clone()).or_insert(1);
        let mut candidate = format!("{name}.{counter}");
        while seen.contains(&candidate) {
            *counter += 1;
            candidate = format!("{name}.{counter}");
        }
        *counter += 1;
        seen.insert(candidate.clone());
        columns.push(candidate);
    }
    Schema::new(columns)
}
