//! Integration tests for the pipeline orchestrator.

use std::fs;

use hcdw_cli::config::PipelineConfig;
use hcdw_cli::pipeline::{PipelineError, PipelineStage, run_pipeline};
use hcdw_ingest::{IngestError, MemorySource};
use hcdw_load::{MemorySink, PersistenceSink, SqliteSink, TargetOutcome};
use hcdw_model::Target;
use tempfile::TempDir;

const PATIENT_HEADERS: &[&str] = &[
    "patient_id",
    "first_name",
    "last_name",
    "date_of_birth",
    "gender",
    "primary_condition",
];
const DOCTOR_HEADERS: &[&str] = &[
    "doctor_id",
    "first_name",
    "last_name",
    "specialization",
    "department",
];
const VISIT_HEADERS: &[&str] = &[
    "visit_id",
    "patient_id",
    "doctor_id",
    "visit_date",
    "symptoms",
    "billing_amount",
];
const DIAGNOSIS_HEADERS: &[&str] = &["diagnosis_id", "visit_id", "diagnosis", "severity"];

fn source() -> MemorySource {
    MemorySource::new()
        .with_rows(
            Target::Patients,
            PATIENT_HEADERS,
            &[
                &["1", "jo hn", "doe", "1980-01-01", "m", "flu"],
                &["1", "Jane", "Roe", "1981-02-02", "f", "cold"],
                &["x", "A", "B", "", "", ""],
                &["2", "mary", "major", "", "female", ""],
            ],
        )
        .with_rows(
            Target::Doctors,
            DOCTOR_HEADERS,
            &[&["7", "ann", "lee", "cardiology", "cardio dept"]],
        )
        .with_rows(
            Target::Visits,
            VISIT_HEADERS,
            &[
                &["100", "1", "7", "2024-01-05", "cough", "120.50"],
                &["101", "99", "7", "2024-01-06", "fever", "80"],
                &["102", "2", "7", "2024-01-07", "", "-5"],
            ],
        )
        .with_rows(
            Target::Diagnosis,
            DIAGNOSIS_HEADERS,
            &[
                &["1", "100", "common cold", "low"],
                &["2", "101", "flu", "high"],
                &["3", "102", "migraine", "medium"],
            ],
        )
}

#[test]
fn unavailable_doctor_source_aborts_before_any_sink_call() {
    let mut source = source();
    source.remove(Target::Doctors);
    let mut sink = MemorySink::new();

    let err = run_pipeline(&source, Some(&mut sink)).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::SourceUnavailable {
            target: Target::Doctors,
            source: IngestError::SourceMissing { .. },
        }
    ));
    assert!(sink.calls().is_empty());
}

#[test]
fn full_run_persists_a_consistent_silver_set() {
    let mut sink = MemorySink::new();
    let outcome = run_pipeline(&source(), Some(&mut sink)).unwrap();

    assert_eq!(
        outcome.stages,
        vec![
            PipelineStage::LoadingRaw,
            PipelineStage::CleaningPatientsDoctors,
            PipelineStage::CleaningVisits,
            PipelineStage::CleaningDiagnosis,
            PipelineStage::Handoff,
            PipelineStage::Done,
        ]
    );
    assert!(outcome.is_complete());

    let [patients, _, visits, diagnosis] = outcome.reports();
    assert_eq!((patients.duplicates, patients.invalid, patients.output), (1, 1, 2));
    assert_eq!((visits.orphaned, visits.output), (1, 2));
    assert_eq!((diagnosis.orphaned, diagnosis.output), (1, 2));

    assert_eq!(sink.keys(Target::Patients), vec![1, 2]);
    assert_eq!(sink.keys(Target::Visits), vec![100, 102]);
    assert_eq!(sink.keys(Target::Diagnosis), vec![1, 3]);

    let verification = outcome.verification.unwrap();
    let rows: Vec<usize> = verification
        .iter()
        .map(|count| count.rows.clone().unwrap())
        .collect();
    assert_eq!(rows, vec![2, 1, 2, 2]);
}

#[test]
fn dry_run_skips_the_handoff() {
    let outcome = run_pipeline(&source(), None).unwrap();

    assert!(outcome.is_dry_run());
    assert!(!outcome.stages.contains(&PipelineStage::Handoff));
    assert_eq!(outcome.stages.last(), Some(&PipelineStage::Done));
    assert_eq!(outcome.silver.visits.rows[0].patient_name, "Jo Hn Doe");
    assert_eq!(outcome.silver.doctors.rows[0].department, "Cardio Department");
}

#[test]
fn a_rejected_target_does_not_stop_later_targets() {
    let mut sink = MemorySink::new().rejecting(Target::Diagnosis);
    let outcome = run_pipeline(&source(), Some(&mut sink)).unwrap();

    let handoff = outcome.handoff.unwrap();
    assert_eq!(handoff.outcome(Target::Visits), Some(&TargetOutcome::Loaded(2)));
    assert!(matches!(
        handoff.outcome(Target::Diagnosis),
        Some(TargetOutcome::Failed(_))
    ));
    assert_eq!(sink.keys(Target::Patients), vec![1, 2]);
}

#[test]
fn csv_directory_to_sqlite_end_to_end() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("Data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(
        data_dir.join("patients.csv"),
        "Patient_ID,First_Name,Last_Name,Date_Of_Birth,Gender,Primary_Condition\n\
         1,jo hn,doe,1980-01-01,M,\n\
         1,Jane,Roe,1981-02-02,F,Asthma\n\
         x,A,B,,,\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("doctors.csv"),
        "doctor_id,first_name,last_name,specialization,department\n7,ann,lee,cardiology,cardio dept\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("visits.csv"),
        "visit_id,patient_id,doctor_id,visit_date,symptoms,billing_amount\n\
         100,1,7,2024-01-05,cough,120.5\n\
         101,99,7,2024-01-06,fever,80\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("diagnosis.csv"),
        "diagnosis_id,visit_id,diagnosis,severity\n1,100,cold,low\n",
    )
    .unwrap();

    let config: PipelineConfig = toml::from_str(&format!(
        "[source]\ndata_dir = {:?}\n\n[sink]\ndatabase = {:?}\n",
        data_dir.display().to_string(),
        dir.path().join("dw.sqlite").display().to_string(),
    ))
    .unwrap();

    let mut sink = config.open_sink().unwrap();
    let sink: &mut dyn PersistenceSink = sink.as_mut();
    let outcome = run_pipeline(&config.raw_source(), Some(sink)).unwrap();
    assert!(outcome.is_complete());

    let mut reopened = SqliteSink::open(&config.sink.database).unwrap();
    assert_eq!(reopened.count(Target::Patients).unwrap(), 1);
    assert_eq!(reopened.count(Target::Visits).unwrap(), 1);
    assert_eq!(reopened.count(Target::Diagnosis).unwrap(), 1);
}
