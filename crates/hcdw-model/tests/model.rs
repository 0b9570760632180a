//! Tests for hcdw-model types.

use hcdw_model::{Cleaned, Doctor, Entity, Patient, RawTable, StageReport, Target};

#[test]
fn entity_keys_and_targets() {
    let doctor = Doctor {
        doctor_id: 4,
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        doctor_name: "Dr. Ann Lee".to_string(),
        specialization: "Cardiology".to_string(),
        department: "Cardiology Department".to_string(),
    };
    assert_eq!(doctor.key(), 4);
    assert_eq!(Doctor::TARGET, Target::Doctors);
    assert_eq!(Patient::TARGET.key_field(), "patient_id");
}

#[test]
fn cleaned_set_reports_length() {
    let cleaned: Cleaned<Patient> = Cleaned {
        rows: Vec::new(),
        report: StageReport::new(Target::Patients, 0),
    };
    assert!(cleaned.is_empty());
    assert_eq!(cleaned.report.dropped(), 0);
}

#[test]
fn raw_table_records_iterate_in_order() {
    let table = RawTable::new(
        Target::Diagnosis,
        vec!["diagnosis_id".to_string(), "visit_id".to_string()],
        vec![
            vec!["1".to_string(), "10".to_string()],
            vec!["2".to_string(), "11".to_string()],
        ],
    );
    let ids: Vec<_> = table
        .records()
        .filter_map(|record| record.get("diagnosis_id"))
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(table.len(), 2);
}

#[test]
fn silver_tables_follow_naming() {
    let tables: Vec<_> = Target::ALL.iter().map(|t| t.silver_table()).collect();
    assert_eq!(
        tables,
        vec![
            "silver_patients",
            "silver_doctors",
            "silver_visits",
            "silver_diagnosis"
        ]
    );
}

#[test]
fn silver_set_reports_in_foreign_key_order() {
    fn empty<T>(target: Target) -> Cleaned<T> {
        Cleaned {
            rows: Vec::new(),
            report: StageReport::new(target, 0),
        }
    }
    let silver = hcdw_model::SilverSet {
        patients: empty(Target::Patients),
        doctors: empty(Target::Doctors),
        visits: empty(Target::Visits),
        diagnosis: empty(Target::Diagnosis),
    };
    let targets: Vec<Target> = silver.reports().iter().map(|r| r.target).collect();
    assert_eq!(targets, Target::ALL.to_vec());
    assert_eq!(silver.total_rows(), 0);
}
