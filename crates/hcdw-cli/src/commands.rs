use anyhow::{Context, Result};
use tracing::info_span;

use hcdw_cli::config::{PipelineConfig, SinkKind};
use hcdw_cli::pipeline::{PipelineError, PipelineOutcome, run_pipeline};
use hcdw_load::{LoadReport, PersistenceSink, TargetCount, load_bronze, verify_targets};

use crate::cli::{BronzeArgs, ConfigArgs, SilverArgs, SinkArgs, SourceArgs, VerifyArgs};

pub fn run_silver(args: &SilverArgs) -> Result<PipelineOutcome> {
    let config = resolve_config(&args.config, Some(&args.source), &args.sink)?;
    let source = config.raw_source();
    let outcome = if args.dry_run {
        run_pipeline(&source, None)?
    } else {
        let mut sink = open_sink(&config)?;
        let sink: &mut dyn PersistenceSink = sink.as_mut();
        run_pipeline(&source, Some(sink))?
    };
    Ok(outcome)
}

pub fn run_bronze(args: &BronzeArgs) -> Result<LoadReport> {
    let _span = info_span!("bronze").entered();
    let config = resolve_config(&args.config, Some(&args.source), &args.sink)?;
    let source = config.raw_source();
    let mut sink = open_sink(&config)?;
    let report = load_bronze(&source, sink.as_mut()).map_err(PipelineError::from)?;
    Ok(report)
}

pub fn run_verify(args: &VerifyArgs) -> Result<Vec<TargetCount>> {
    let config = resolve_config(&args.config, None, &args.sink)?;
    let mut sink = open_sink(&config)?;
    Ok(verify_targets(sink.as_mut()))
}

/// Defaults, then the config file, then flags.
fn resolve_config(
    config: &ConfigArgs,
    source: Option<&SourceArgs>,
    sink: &SinkArgs,
) -> Result<PipelineConfig, PipelineError> {
    let mut resolved =
        PipelineConfig::load_or_default(config.config.as_deref()).map_err(PipelineError::from)?;
    if let Some(data_dir) = source.and_then(|source| source.data_dir.clone()) {
        resolved.source.data_dir = data_dir;
    }
    if let Some(kind) = sink.sink {
        resolved.sink.kind = kind.into();
    }
    if let Some(database) = &sink.database {
        resolved.sink.database.clone_from(database);
    }
    if let Some(output_dir) = &sink.output_dir {
        resolved.sink.output_dir.clone_from(output_dir);
    }
    Ok(resolved)
}

fn open_sink(config: &PipelineConfig) -> Result<Box<dyn PersistenceSink>> {
    let target = match config.sink.kind {
        SinkKind::Sqlite => config.sink.database.display().to_string(),
        SinkKind::Csv => config.sink.output_dir.display().to_string(),
    };
    config
        .open_sink()
        .map_err(PipelineError::from)
        .with_context(|| format!("open sink {target}"))
}
