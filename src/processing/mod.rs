//! In-memory dataset transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! Every function here is pure: inputs are borrowed and new datasets are returned.
//!
//! - [`currency`]: money-column formatting
//! - [`filter`]: per-column value selection and the matched/excluded partition
//! - [`search`]: candidate values for a column filter
//! - [`project`]: display column projection
//!
//! ## Example: normalize → filter → project
//!
//! ```rust
//! use smart_filter::processing::{
//!     normalize_currency_columns, project, split, FilterOptions, FilterSpec, KeywordClassifier,
//! };
//! use smart_filter::types::{DataSet, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(["region", "net_amt"]),
//!     vec![
//!         vec![Value::text("North"), Value::text("1234.5")],
//!         vec![Value::text("South"), Value::text("99")],
//!     ],
//! );
//!
//! let ds = normalize_currency_columns(&ds, &KeywordClassifier::default());
//! let spec = FilterSpec::new().select("region", ["North"]);
//! let (matched, excluded) = split(&ds, &spec, &FilterOptions::default()).unwrap();
//!
//! let matched = project(&matched, &["net_amt"]).unwrap();
//! assert_eq!(matched.rows, vec![vec![Value::text("1,234.50")]]);
//! assert_eq!(excluded.row_count(), 1);
//! ```

pub mod currency;
pub mod filter;
pub mod project;
pub mod search;

pub use currency::{
    format_currency, normalize_currency_columns, ColumnClassifier, KeywordClassifier,
    DEFAULT_MONEY_KEYWORDS,
};
pub use filter::{partition, split, EmptySelection, FilterOptions, FilterSpec, Partition};
pub use project::project;
pub use search::{distinct_values, narrow_candidates, SEARCH_PREFIX_CHARS};
