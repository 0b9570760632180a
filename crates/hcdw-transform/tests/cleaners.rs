//! End-to-end tests for the entity cleaners.

use std::collections::BTreeSet;

use hcdw_model::{RawTable, Target};
use hcdw_transform::{clean_diagnosis, clean_doctors, clean_patients, clean_visits};

fn table(target: Target, headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        target,
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| (*c).to_string()).collect())
            .collect(),
    )
}

fn patients(rows: &[&[&str]]) -> RawTable {
    table(
        Target::Patients,
        &["patient_id", "first_name", "last_name", "date_of_birth", "gender", "primary_condition"],
        rows,
    )
}

fn doctors(rows: &[&[&str]]) -> RawTable {
    table(
        Target::Doctors,
        &["doctor_id", "first_name", "last_name", "specialization", "department"],
        rows,
    )
}

fn visits(rows: &[&[&str]]) -> RawTable {
    table(
        Target::Visits,
        &["visit_id", "patient_id", "doctor_id", "visit_date", "symptoms", "billing_amount"],
        rows,
    )
}

fn diagnosis(rows: &[&[&str]]) -> RawTable {
    table(
        Target::Diagnosis,
        &["diagnosis_id", "visit_id", "diagnosis", "severity"],
        rows,
    )
}

#[test]
fn duplicate_and_invalid_patients_are_dropped() {
    let cleaned = clean_patients(&patients(&[
        &["1", "jo hn", "doe", "1980-01-01", "m", "flu"],
        &["1", "Jane", "Roe", "1981-02-02", "f", "cold"],
        &["x", "A", "B", "", "", ""],
    ]));

    assert_eq!(cleaned.len(), 1);
    let patient = &cleaned.rows[0];
    assert_eq!(patient.patient_id, 1);
    assert_eq!(patient.first_name, "Jo Hn");
    assert_eq!(patient.patient_name, "Jo Hn Doe");
    assert_eq!(cleaned.report.duplicates, 1);
    assert_eq!(cleaned.report.invalid, 1);
}

#[test]
fn dangling_references_never_reach_the_silver_set() {
    let patients = clean_patients(&patients(&[&["1", "john", "doe", "", "m", ""]])).rows;
    let doctors = clean_doctors(&doctors(&[&["7", "ann", "lee", "cardiology", "cardio dept"]])).rows;
    let visits = clean_visits(
        &visits(&[
            &["100", "1", "7", "2024-01-05", "cough", "10"],
            &["101", "99", "7", "2024-01-06", "fever", "20"],
        ]),
        &patients,
        &doctors,
    );
    assert_eq!(visits.report.orphaned, 1);

    let diagnosis = clean_diagnosis(
        &diagnosis(&[&["1", "100", "cold", "low"], &["2", "101", "flu", "high"]]),
        &visits.rows,
    );
    assert_eq!(diagnosis.report.orphaned, 1);

    let patient_ids: BTreeSet<i64> = patients.iter().map(|p| p.patient_id).collect();
    let doctor_ids: BTreeSet<i64> = doctors.iter().map(|d| d.doctor_id).collect();
    let visit_ids: BTreeSet<i64> = visits.rows.iter().map(|v| v.visit_id).collect();
    assert!(
        visits
            .rows
            .iter()
            .all(|v| patient_ids.contains(&v.patient_id) && doctor_ids.contains(&v.doctor_id))
    );
    assert!(diagnosis.rows.iter().all(|d| visit_ids.contains(&d.visit_id)));
}

#[test]
fn cleaning_cleaned_keys_changes_nothing() {
    let raw = patients(&[
        &["3", "a", "b", "", "", ""],
        &["3", "c", "d", "", "", ""],
        &["4", "e", "f", "", "", ""],
    ]);
    let first = clean_patients(&raw);

    let rerun_rows: Vec<Vec<String>> = first
        .rows
        .iter()
        .map(|p| {
            vec![
                p.patient_id.to_string(),
                p.first_name.clone(),
                p.last_name.clone(),
                String::new(),
                String::new(),
                p.primary_condition.clone(),
            ]
        })
        .collect();
    let rerun = RawTable::new(Target::Patients, raw.headers.clone(), rerun_rows);
    let second = clean_patients(&rerun);

    assert_eq!(first.rows, second.rows);
    assert_eq!(second.report.duplicates, 0);
}

#[test]
fn every_input_row_is_accounted_for() {
    let cleaned = clean_visits(
        &visits(&[
            &["1", "1", "1", "", "", ""],
            &["1", "1", "1", "", "", ""],
            &["bad", "1", "1", "", "", ""],
            &["2", "5", "1", "", "", ""],
        ]),
        &clean_patients(&patients(&[&["1", "a", "b", "", "", ""]])).rows,
        &clean_doctors(&doctors(&[&["1", "c", "d", "", ""]])).rows,
    );
    let report = cleaned.report;
    assert_eq!(report.input, 4);
    assert_eq!(report.output, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.invalid, 1);
    assert_eq!(report.orphaned, 1);
    assert!(report.is_balanced());
}
