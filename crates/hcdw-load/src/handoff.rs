//! Replacing the silver tables with a freshly cleaned silver set.

use std::collections::BTreeMap;

use hcdw_model::{SilverSet, Target};
use tracing::{info, info_span, warn};

use crate::error::Result;
use crate::sink::{PersistenceSink, SilverBatch, with_foreign_keys_suspended};

/// What happened to one target during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    Loaded(usize),
    Failed(String),
}

impl TargetOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLoad {
    pub target: Target,
    pub outcome: TargetOutcome,
}

/// Per-target outcomes of a load, in the order the targets were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub targets: Vec<TargetLoad>,
}

impl LoadReport {
    pub(crate) fn record(&mut self, target: Target, outcome: TargetOutcome) {
        match &outcome {
            TargetOutcome::Loaded(rows) => info!(%target, rows, "loaded target"),
            TargetOutcome::Failed(error) => warn!(%target, %error, "failed to load target"),
        }
        self.targets.push(TargetLoad { target, outcome });
    }

    pub fn outcome(&self, target: Target) -> Option<&TargetOutcome> {
        self.targets
            .iter()
            .find(|load| load.target == target)
            .map(|load| &load.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetLoad> {
        self.targets.iter().filter(|load| !load.outcome.is_loaded())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Replaces the contents of every silver target with `silver`.
///
/// Targets are cleared child-first with foreign key checks suspended, then
/// appended parent-first with checks restored. A target that fails to clear
/// is not appended to. A failed target never stops the remaining targets and
/// never undoes targets already written. Only a schema or foreign key toggle
/// failure is returned as an error.
pub fn replace_silver(sink: &mut dyn PersistenceSink, silver: &SilverSet) -> Result<LoadReport> {
    let _span = info_span!("replace_silver", sink = %sink.describe()).entered();
    sink.ensure_schema()?;

    let cleared: BTreeMap<Target, String> = with_foreign_keys_suspended(sink, |sink| {
        Target::ALL
            .iter()
            .rev()
            .filter_map(|&target| {
                sink.clear(target)
                    .err()
                    .map(|error| (target, error.to_string()))
            })
            .collect()
    })?;

    let mut report = LoadReport::default();
    for target in Target::ALL {
        let outcome = match cleared.get(&target) {
            Some(error) => TargetOutcome::Failed(format!("clear failed: {error}")),
            None => match sink.append(SilverBatch::from_silver(silver, target)) {
                Ok(rows) => TargetOutcome::Loaded(rows),
                Err(error) => TargetOutcome::Failed(error.to_string()),
            },
        };
        report.record(target, outcome);
    }
    Ok(report)
}
