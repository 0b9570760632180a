//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use hcdw_cli::config::SinkKind;
use hcdw_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "hcdw",
    version,
    about = "Healthcare data warehouse pipeline - clean raw extracts into silver tables",
    long_about = "Clean raw patient, doctor, visit and diagnosis extracts into\n\
                  referentially consistent silver tables.\n\n\
                  Writes to a SQLite database or a directory of CSV files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values (PHI) in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean the raw extracts and replace the silver tables.
    Silver(SilverArgs),

    /// Append the raw extracts, uncoerced, to the bronze tables.
    Bronze(BronzeArgs),

    /// Print stored row counts of the silver tables.
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct SilverArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sink: SinkArgs,

    /// Clean and report without writing to the sink.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct BronzeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sink: SinkArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub sink: SinkArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML config file (flags override its values).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Directory containing the raw CSV extracts.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct SinkArgs {
    /// Where to write tables.
    #[arg(long = "sink", value_enum)]
    pub sink: Option<SinkKindArg>,

    /// SQLite database file (sqlite sink).
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Output directory (csv sink).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// CLI sink choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum SinkKindArg {
    Sqlite,
    Csv,
}

impl From<SinkKindArg> for SinkKind {
    fn from(arg: SinkKindArg) -> Self {
        match arg {
            SinkKindArg::Sqlite => SinkKind::Sqlite,
            SinkKindArg::Csv => SinkKind::Csv,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
