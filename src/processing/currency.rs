//! Cosmetic formatting of money-looking columns.
//!
//! [`format_currency`] turns `"1234.5"` into `"1,234.50"` and leaves anything it cannot parse
//! untouched. Which columns get formatted is decided by a [`ColumnClassifier`]; the default
//! [`KeywordClassifier`] looks for a fixed set of keywords in the column name.

use crate::types::{DataSet, Value};

/// Column-name keywords that mark a money column by default.
pub const DEFAULT_MONEY_KEYWORDS: &[&str] =
    &["AMT", "NET", "VAT", "PRICE", "COST", "TOTAL", "DEPTOT"];

/// Decides whether a column holds monetary values.
pub trait ColumnClassifier {
    /// Returns `true` if cells of `column` should be passed through [`format_currency`].
    fn is_currency(&self, column: &str) -> bool;
}

impl<F> ColumnClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_currency(&self, column: &str) -> bool {
        self(column)
    }
}

/// Matches column names that contain any keyword, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Build a classifier from a custom keyword list.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Add a keyword to the list.
    pub fn with_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        let k = keyword.as_ref().to_uppercase();
        if !k.is_empty() && !self.keywords.contains(&k) {
            self.keywords.push(k);
        }
        self
    }

    /// Configured keywords (upper-cased).
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MONEY_KEYWORDS)
    }
}

impl ColumnClassifier for KeywordClassifier {
    fn is_currency(&self, column: &str) -> bool {
        let upper = column.to_uppercase();
        self.keywords.iter().any(|k| upper.contains(k.as_str()))
    }
}

/// Format a cell as money: two decimals, comma thousands grouping.
///
/// - empty, blank or `"nan"` (any case) -> `""`
/// - commas are stripped before parsing, surrounding whitespace is ignored
/// - anything that does not parse to a finite number is returned unchanged
pub fn format_currency(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }

    let cleaned = trimmed.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => group_thousands(&format!("{v:.2}")),
        _ => raw.to_owned(),
    }
}

/// [`format_currency`] lifted to cells. Missing values become `""`.
pub fn format_currency_value(value: &Value) -> Value {
    match value {
        Value::Null => Value::Text(String::new()),
        Value::Text(s) => Value::Text(format_currency(s)),
    }
}

/// Return a copy of `dataset` with every currency column formatted.
pub fn normalize_currency_columns(dataset: &DataSet, classifier: &dyn ColumnClassifier) -> DataSet {
    let money_columns: Vec<&str> = dataset
        .schema
        .column_names()
        .filter(|c| classifier.is_currency(c))
        .collect();
    tracing::debug!(columns = ?money_columns, "formatting currency columns");

    dataset.map_columns(|c| classifier.is_currency(c), format_currency_value)
}

// Input is the output of `{:.2}`: optional '-', ASCII digits, '.', two digits.
fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
