//! All four raw tables of one run, read up front.

use hcdw_model::{RawTable, Target};
use tracing::{info, warn};

use crate::error::SourceUnavailable;
use crate::source::RawSource;

/// Raw inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub patients: RawTable,
    pub doctors: RawTable,
    pub visits: RawTable,
    pub diagnosis: RawTable,
}

impl RawSnapshot {
    pub fn table(&self, target: Target) -> &RawTable {
        match target {
            Target::Patients => &self.patients,
            Target::Doctors => &self.doctors,
            Target::Visits => &self.visits,
            Target::Diagnosis => &self.diagnosis,
        }
    }

    pub fn total_rows(&self) -> usize {
        Target::ALL.iter().map(|t| self.table(*t).len()).sum()
    }
}

/// Reads every target from `source`.
///
/// Stops at the first unavailable source; nothing is returned partially.
pub fn read_snapshot(source: &dyn RawSource) -> Result<RawSnapshot, SourceUnavailable> {
    let read = |target: Target| {
        let location = source.describe(target);
        match source.read(target) {
            Ok(table) => {
                info!(%target, source = %location, rows = table.len(), "loaded raw source");
                Ok(table)
            }
            Err(error) => {
                warn!(%target, source = %location, %error, "raw source unavailable");
                Err(SourceUnavailable {
                    target,
                    source: error,
                })
            }
        }
    };
    Ok(RawSnapshot {
        patients: read(Target::Patients)?,
        doctors: read(Target::Doctors)?,
        visits: read(Target::Visits)?,
        diagnosis: read(Target::Diagnosis)?,
    })
}
