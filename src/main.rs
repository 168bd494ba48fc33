//! `smart-filter` command-line shell.

use clap::Parser;

mod cli;
mod commands;
mod logging;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::commands::{run_sheets, run_split, run_values};
use crate::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    init_logging(&log_config_from_cli(&cli));

    let result = match &cli.command {
        Command::Sheets(args) => run_sheets(args),
        Command::Values(args) => run_values(args),
        Command::Split(args) => run_split(args).map(|summary| {
            println!("filtered rows: {}", summary.matched);
            println!("excluded rows: {}", summary.excluded);
        }),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` applies unless `-v`/`-q` was given.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        },
        ..LogConfig::default()
    }
}
