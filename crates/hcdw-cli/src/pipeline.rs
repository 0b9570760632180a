//! Silver pipeline orchestration.
//!
//! Stages run strictly forward:
//! 1. **Loading raw**: read all four raw sources; any failure aborts the run
//! 2. **Cleaning patients and doctors**: both cleaners run concurrently
//! 3. **Cleaning visits**: against the cleaned patients and doctors
//! 4. **Cleaning diagnosis**: against the cleaned visits
//! 5. **Handoff**: replace the silver targets and count what was stored
//!
//! Each stage function consumes the typed output of the stage before it, so a
//! stage cannot run before its inputs exist.

use std::fmt;

use hcdw_ingest::{IngestError, RawSnapshot, RawSource, SourceUnavailable, read_snapshot};
use hcdw_load::{LoadReport, PersistenceSink, SinkError, TargetCount, replace_silver, verify_targets};
use hcdw_model::{Cleaned, Doctor, Patient, SilverSet, StageReport, Target, Visit};
use hcdw_transform::{clean_diagnosis, clean_doctors, clean_patients, clean_visits};
use thiserror::Error;
use tracing::{error, info, info_span};

use crate::config::ConfigError;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    LoadingRaw,
    CleaningPatientsDoctors,
    CleaningVisits,
    CleaningDiagnosis,
    Handoff,
    Done,
}

impl PipelineStage {
    /// The stage after this one; `None` once done.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::LoadingRaw => Some(Self::CleaningPatientsDoctors),
            Self::CleaningPatientsDoctors => Some(Self::CleaningVisits),
            Self::CleaningVisits => Some(Self::CleaningDiagnosis),
            Self::CleaningDiagnosis => Some(Self::Handoff),
            Self::Handoff => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LoadingRaw => "loading_raw",
            Self::CleaningPatientsDoctors => "cleaning_patients_doctors",
            Self::CleaningVisits => "cleaning_visits",
            Self::CleaningDiagnosis => "cleaning_diagnosis",
            Self::Handoff => "handoff",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A raw source could not be read; nothing was cleaned or written.
    #[error("{target} source unavailable: {source}")]
    SourceUnavailable {
        target: Target,
        #[source]
        source: IngestError,
    },

    /// The sink could not be opened or its schema created.
    #[error("sink unavailable: {0}")]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<SourceUnavailable> for PipelineError {
    fn from(err: SourceUnavailable) -> Self {
        Self::SourceUnavailable {
            target: err.target,
            source: err.source,
        }
    }
}

/// Cleaned parent entity sets.
#[derive(Debug, Clone)]
pub struct ParentSet {
    pub patients: Cleaned<Patient>,
    pub doctors: Cleaned<Doctor>,
}

/// Cleaned parents plus the visits that reference them.
#[derive(Debug, Clone)]
pub struct VisitSet {
    pub parents: ParentSet,
    pub visits: Cleaned<Visit>,
}

/// Cleans patients and doctors concurrently.
pub fn clean_parent_stage(snapshot: &RawSnapshot) -> ParentSet {
    let _span = info_span!("stage", stage = %PipelineStage::CleaningPatientsDoctors).entered();
    let (patients, doctors) = rayon::join(
        || clean_patients(&snapshot.patients),
        || clean_doctors(&snapshot.doctors),
    );
    log_report(&patients.report);
    log_report(&doctors.report);
    ParentSet { patients, doctors }
}

pub fn clean_visit_stage(snapshot: &RawSnapshot, parents: ParentSet) -> VisitSet {
    let _span = info_span!("stage", stage = %PipelineStage::CleaningVisits).entered();
    let visits = clean_visits(
        &snapshot.visits,
        &parents.patients.rows,
        &parents.doctors.rows,
    );
    log_report(&visits.report);
    VisitSet { parents, visits }
}

pub fn clean_diagnosis_stage(snapshot: &RawSnapshot, visits: VisitSet) -> SilverSet {
    let _span = info_span!("stage", stage = %PipelineStage::CleaningDiagnosis).entered();
    let diagnosis = clean_diagnosis(&snapshot.diagnosis, &visits.visits.rows);
    log_report(&diagnosis.report);
    SilverSet {
        patients: visits.parents.patients,
        doctors: visits.parents.doctors,
        visits: visits.visits,
        diagnosis,
    }
}

/// Runs every cleaning stage over a raw snapshot.
pub fn clean_snapshot(snapshot: &RawSnapshot) -> SilverSet {
    let parents = clean_parent_stage(snapshot);
    let visits = clean_visit_stage(snapshot, parents);
    clean_diagnosis_stage(snapshot, visits)
}

fn log_report(report: &StageReport) {
    info!(
        entity = report.target.label(),
        input = report.input,
        duplicates = report.duplicates,
        invalid = report.invalid,
        orphaned = report.orphaned,
        output = report.output,
        "cleaned entity"
    );
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Stages that ran, in order.
    pub stages: Vec<PipelineStage>,
    pub silver: SilverSet,
    /// Per-target load outcomes; `None` on a dry run.
    pub handoff: Option<LoadReport>,
    /// Stored row counts after the handoff; `None` on a dry run.
    pub verification: Option<Vec<TargetCount>>,
}

impl PipelineOutcome {
    /// Per-entity cleaning counts in foreign-key order.
    pub fn reports(&self) -> [StageReport; 4] {
        self.silver.reports()
    }

    pub fn is_dry_run(&self) -> bool {
        self.handoff.is_none()
    }

    /// Whether every target that was handed off loaded.
    pub fn is_complete(&self) -> bool {
        self.handoff.as_ref().is_none_or(LoadReport::is_complete)
    }
}

/// Runs the pipeline end to end.
///
/// All raw sources are read before anything else happens; if one is
/// unavailable the run stops and the sink is never touched. Without a sink the
/// run stops after cleaning. Per-target persistence failures are reported in
/// the outcome, not returned as errors.
pub fn run_pipeline(
    source: &dyn RawSource,
    sink: Option<&mut dyn PersistenceSink>,
) -> Result<PipelineOutcome, PipelineError> {
    let _span = info_span!("pipeline").entered();
    let mut stages = vec![PipelineStage::LoadingRaw];

    let snapshot = info_span!("stage", stage = %PipelineStage::LoadingRaw)
        .in_scope(|| read_snapshot(source))
        .inspect_err(|err| error!(target_set = %err.target, error = %err.source, "aborting run"))?;
    info!(rows = snapshot.total_rows(), "loaded raw snapshot");

    let parents = clean_parent_stage(&snapshot);
    stages.push(PipelineStage::CleaningPatientsDoctors);
    let visits = clean_visit_stage(&snapshot, parents);
    stages.push(PipelineStage::CleaningVisits);
    let silver = clean_diagnosis_stage(&snapshot, visits);
    stages.push(PipelineStage::CleaningDiagnosis);

    let (handoff, verification) = match sink {
        Some(sink) => {
            let _stage = info_span!("stage", stage = %PipelineStage::Handoff).entered();
            stages.push(PipelineStage::Handoff);
            let report = replace_silver(sink, &silver)?;
            let counts = verify_targets(sink);
            (Some(report), Some(counts))
        }
        None => {
            info!("dry run, skipping handoff");
            (None, None)
        }
    };
    stages.push(PipelineStage::Done);

    Ok(PipelineOutcome {
        stages,
        silver,
        handoff,
        verification,
    })
}
