//! CLI argument definitions for `smart-filter`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use smart_filter::processing::EmptySelection;

#[derive(Parser)]
#[command(
    name = "smart-filter",
    version,
    about = "Split a CSV or Excel table into filtered and excluded rows",
    long_about = "Load a CSV or Excel table, keep the rows whose values are in the selected sets,\n\
                  and export the filtered and excluded halves as PDF and/or XLSX."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the sheets of a workbook.
    Sheets(SheetsArgs),

    /// Print the candidate values of a column, after earlier selections and a search string.
    Values(ValuesArgs),

    /// Filter a table and write the filtered and excluded halves.
    Split(SplitArgs),
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// CSV or workbook file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct ValuesArgs {
    /// CSV or workbook file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column whose values are listed.
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: String,

    /// Keep values whose first three characters contain this text (case-insensitive).
    #[arg(long = "search", value_name = "TEXT", default_value = "")]
    pub search: String,

    /// Workbook sheet to load (default: the first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    // Earlier selections: only rows that satisfy them contribute values.
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Parser)]
pub struct SplitArgs {
    /// CSV or workbook file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Workbook sheet to load (default: the first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Columns to display, comma-separated (default: all columns).
    #[arg(long = "columns", value_name = "COLUMNS", value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Directory the exports are written to.
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Export format.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// TrueType font to embed in PDF exports (falls back to Helvetica if unusable).
    #[arg(long = "font", value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Repeat the header row at the top of every PDF page.
    #[arg(long = "repeat-header")]
    pub repeat_header: bool,
}

/// Column selections shared by `values` and `split`.
#[derive(Args)]
pub struct FilterArgs {
    /// Column selection as COLUMN=VALUE[,VALUE...]; repeat for more columns.
    #[arg(long = "filter", value_name = "COLUMN=VALUES", value_parser = parse_filter)]
    pub filters: Vec<(String, Vec<String>)>,

    /// JSON file mapping column names to arrays of permitted values.
    #[arg(long = "filter-file", value_name = "PATH")]
    pub filter_file: Option<PathBuf>,

    /// Meaning of a filter with no values.
    #[arg(long = "empty-selection", value_enum, default_value = "match-nothing")]
    pub empty_selection: EmptySelectionArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormatArg {
    Pdf,
    Xlsx,
    Both,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EmptySelectionArg {
    /// The filter removes every row.
    MatchNothing,
    /// The filter is ignored.
    Unconstrained,
}

impl From<EmptySelectionArg> for EmptySelection {
    fn from(arg: EmptySelectionArg) -> Self {
        match arg {
            EmptySelectionArg::MatchNothing => Self::MatchNothing,
            EmptySelectionArg::Unconstrained => Self::Unconstrained,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
}

/// Parse `COLUMN=v1,v2`. `COLUMN=` selects no values.
fn parse_filter(raw: &str) -> Result<(String, Vec<String>), String> {
    let (column, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUES, got '{raw}'"))?;
    if column.is_empty() {
        return Err(format!("missing column name in '{raw}'"));
    }
    let values = if values.is_empty() {
        Vec::new()
    } else {
        values.split(',').map(str::to_string).collect()
    };
    Ok((column.to_string(), values))
}

#[cfg(test)]
mod tests {
    use super::{parse_filter, Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_argument_splits_on_first_equals() {
        let (column, values) = parse_filter("note=a=b,c").unwrap();
        assert_eq!(column, "note");
        assert_eq!(values, vec!["a=b".to_string(), "c".to_string()]);
    }

    #[test]
    fn filter_argument_without_values_selects_nothing() {
        assert_eq!(parse_filter("region=").unwrap(), ("region".to_string(), vec![]));
        assert!(parse_filter("region").is_err());
        assert!(parse_filter("=North").is_err());
    }

    #[test]
    fn values_accepts_earlier_selections() {
        let cli = Cli::try_parse_from([
            "smart-filter",
            "values",
            "sales.csv",
            "--column",
            "product",
            "--filter",
            "region=North",
            "--search",
            "gi",
        ])
        .unwrap();
        let Command::Values(args) = cli.command else {
            panic!("expected the values command");
        };
        assert_eq!(args.column, "product");
        assert_eq!(
            args.filter.filters,
            vec![("region".to_string(), vec!["North".to_string()])]
        );
        assert!(args.filter.filter_file.is_none());
    }
}
