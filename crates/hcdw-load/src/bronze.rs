//! Raw ingestion into the bronze tables.

use hcdw_ingest::{RawSource, SourceUnavailable, read_snapshot};
use hcdw_model::Target;
use tracing::info_span;

use crate::handoff::{LoadReport, TargetOutcome};
use crate::sink::PersistenceSink;

/// Appends every raw table, as the source read it, to its bronze target.
///
/// Values are never coerced or normalized. CSV sources do trim cells and skip
/// fully blank lines, so bronze rows from files hold trimmed text.
///
/// All four sources are read before anything is written, so an unavailable
/// source leaves the sink untouched.
pub fn load_bronze(
    source: &dyn RawSource,
    sink: &mut dyn PersistenceSink,
) -> Result<LoadReport, SourceUnavailable> {
    let _span = info_span!("load_bronze", sink = %sink.describe()).entered();
    let snapshot = read_snapshot(source)?;

    let mut report = LoadReport::default();
    for target in Target::ALL {
        let outcome = match sink.append_raw(snapshot.table(target)) {
            Ok(rows) => TargetOutcome::Loaded(rows),
            Err(error) => TargetOutcome::Failed(error.to_string()),
        };
        report.record(target, outcome);
    }
    Ok(report)
}
