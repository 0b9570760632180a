//! Post-load row counts.

use hcdw_model::Target;
use tracing::{info, warn};

use crate::sink::PersistenceSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCount {
    pub target: Target,
    /// Stored rows, or the error message if counting failed.
    pub rows: Result<usize, String>,
}

/// Counts the stored rows of every silver target.
///
/// Counting failures are reported per target and do not stop the others.
pub fn verify_targets(sink: &mut dyn PersistenceSink) -> Vec<TargetCount> {
    Target::ALL
        .into_iter()
        .map(|target| {
            let rows = sink.count(target).map_err(|error| error.to_string());
            match &rows {
                Ok(rows) => info!(table = target.silver_table(), rows, "verified target"),
                Err(error) => warn!(table = target.silver_table(), %error, "failed to verify target"),
            }
            TargetCount { target, rows }
        })
        .collect()
}
