//! Candidate values offered by a column filter.

use std::collections::HashSet;

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::DataSet;

/// Number of leading characters of each candidate that a search is matched against.
pub const SEARCH_PREFIX_CHARS: usize = 3;

/// Distinct non-missing values of `column`, in order of first appearance.
pub fn distinct_values(dataset: &DataSet, column: &str) -> SmartFilterResult<Vec<String>> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| SmartFilterError::UnknownColumn {
            column: column.to_owned(),
            available: dataset.schema.columns.clone(),
        })?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for row in &dataset.rows {
        if let Some(s) = row[idx].as_str() {
            if seen.insert(s) {
                out.push(s.to_owned());
            }
        }
    }
    Ok(out)
}

/// Narrow `values` to those whose first [`SEARCH_PREFIX_CHARS`] characters contain `search`,
/// ignoring case. An empty search returns every value.
///
/// Only the prefix is searched: `"123"` does not find `"ABC123"`.
pub fn narrow_candidates<S: AsRef<str>>(values: &[S], search: &str) -> Vec<String> {
    if search.is_empty() {
        return values.iter().map(|v| v.as_ref().to_owned()).collect();
    }
    let needle = search.to_lowercase();
    values
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| {
            let prefix: String = v.chars().take(SEARCH_PREFIX_CHARS).collect();
            prefix.to_lowercase().contains(&needle)
        })
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{distinct_values, narrow_candidates};
    use crate::types::{DataSet, Schema, Value};

    #[test]
    fn narrowing_matches_first_three_characters_only() {
        let values = ["ABC123", "ABD999", "XYZ000"];
        assert_eq!(narrow_candidates(&values, "ab"), vec!["ABC123", "ABD999"]);
        assert!(narrow_candidates(&values, "123").is_empty());
        assert_eq!(narrow_candidates(&values, "z"), vec!["XYZ000"]);
    }

    #[test]
    fn empty_search_returns_all_values() {
        let values = vec!["b".to_string(), "a".to_string()];
        assert_eq!(narrow_candidates(&values, ""), vec!["b", "a"]);
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let values = ["กขคง", "ขคงจ"];
        assert_eq!(narrow_candidates(&values, "ค"), vec!["กขคง", "ขคงจ"]);
        assert_eq!(narrow_candidates(&values, "ง"), vec!["ขคงจ"]);
    }

    #[test]
    fn distinct_values_skip_nulls_and_keep_first_seen_order() {
        let ds = DataSet::new(
            Schema::new(["region"]),
            vec![
                vec![Value::text("South")],
                vec![Value::Null],
                vec![Value::text("North")],
                vec![Value::text("South")],
            ],
        );
        assert_eq!(distinct_values(&ds, "region").unwrap(), vec!["South", "North"]);
        assert!(distinct_values(&ds, "missing").is_err());
    }
}
