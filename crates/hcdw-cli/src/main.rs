//! Healthcare data warehouse pipeline CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use hcdw_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_bronze, run_silver, run_verify};
use crate::summary::{print_load_table, print_silver_summary, print_verification_table};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match &cli.command {
        Command::Silver(args) => finish(run_silver(args), print_silver_summary),
        Command::Bronze(args) => finish(run_bronze(args), print_load_table),
        Command::Verify(args) => finish(run_verify(args), |counts| {
            print_verification_table(counts);
        }),
    }
}

/// Prints a successful result; per-target failures inside it keep exit code 0.
fn finish<T>(result: anyhow::Result<T>, print: impl FnOnce(&T)) -> ExitCode {
    match result {
        Ok(value) => {
            print(&value);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// `--log-level` beats `-v`/`-q`; either one disables the `RUST_LOG` override.
fn log_config(cli: &Cli) -> LogConfig {
    let explicit = cli.log_level.is_some() || cli.verbosity.is_present();
    let level_filter = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter,
        use_env_filter: !explicit,
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
    .with_log_data(cli.log_data)
}
