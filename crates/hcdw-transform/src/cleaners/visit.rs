use std::collections::BTreeMap;

use hcdw_model::{Cleaned, Doctor, Patient, RawRecord, RawTable, StageReport, Target, Visit};
use tracing::debug_span;

use super::{Keyed, coerce_foreign_keys, coerce_keys, dedupe_keyed, finish, record_orphans};
use crate::normalization::{coerce_amount, coerce_integer, normalize_optional_text, parse_date};
use crate::referential::{ParentKeys, Reference, retain_referenced};

#[derive(Debug, Clone, Copy)]
struct VisitKeys {
    visit_id: i64,
    patient_id: i64,
    doctor_id: i64,
}

fn patient_ref(row: &Keyed<'_, VisitKeys>) -> i64 {
    row.keys.patient_id
}

fn doctor_ref(row: &Keyed<'_, VisitKeys>) -> i64 {
    row.keys.doctor_id
}

/// Cleans raw visit rows against the cleaned patient and doctor sets.
///
/// A visit survives only if both its patient and its doctor survived; the
/// display names of both are copied onto the visit.
pub fn clean_visits(raw: &RawTable, patients: &[Patient], doctors: &[Doctor]) -> Cleaned<Visit> {
    let _span = debug_span!("clean_visits", input = raw.len()).entered();
    let mut report = StageReport::new(Target::Visits, raw.len());

    let keyed = coerce_keys(raw, &mut report, |record| coerce_integer(record.get("visit_id")));
    let keyed = dedupe_keyed(keyed, &mut report, |id| *id);
    let keyed = coerce_foreign_keys(keyed, &mut report, |visit_id, record| {
        Some(VisitKeys {
            visit_id,
            patient_id: coerce_integer(record.get("patient_id"))?,
            doctor_id: coerce_integer(record.get("doctor_id"))?,
        })
    });

    let patient_keys = ParentKeys::from_entities(patients);
    let doctor_keys = ParentKeys::from_entities(doctors);
    let retained = retain_referenced(
        keyed,
        &[
            Reference {
                field: Target::Patients.key_field(),
                parents: &patient_keys,
                key: patient_ref,
            },
            Reference {
                field: Target::Doctors.key_field(),
                parents: &doctor_keys,
                key: doctor_ref,
            },
        ],
    );
    record_orphans(&retained, &mut report);

    let patient_names: BTreeMap<i64, &str> = patients
        .iter()
        .map(|p| (p.patient_id, p.patient_name.as_str()))
        .collect();
    let doctor_names: BTreeMap<i64, &str> = doctors
        .iter()
        .map(|d| (d.doctor_id, d.doctor_name.as_str()))
        .collect();

    let rows = retained
        .rows
        .into_iter()
        .map(|row| {
            let patient_name = patient_names
                .get(&row.keys.patient_id)
                .map(|name| (*name).to_string())
                .unwrap_or_default();
            let doctor_name = doctor_names
                .get(&row.keys.doctor_id)
                .map(|name| (*name).to_string())
                .unwrap_or_default();
            build_visit(row.keys, &row.record, patient_name, doctor_name)
        })
        .collect();
    finish(rows, report)
}

fn build_visit(
    keys: VisitKeys,
    record: &RawRecord<'_>,
    patient_name: String,
    doctor_name: String,
) -> Visit {
    Visit {
        visit_id: keys.visit_id,
        patient_id: keys.patient_id,
        doctor_id: keys.doctor_id,
        visit_date: parse_date(record.get("visit_date")),
        symptoms: normalize_optional_text(record.get("symptoms")),
        billing_amount: coerce_amount(record.get("billing_amount")),
        patient_name,
        doctor_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcdw_model::Gender;

    fn patient(id: i64, name: &str) -> Patient {
        Patient {
            patient_id: id,
            first_name: name.to_string(),
            last_name: String::new(),
            patient_name: name.to_string(),
            date_of_birth: None,
            gender: Gender::Other,
            primary_condition: "Unknown".to_string(),
        }
    }

    fn doctor(id: i64, name: &str) -> Doctor {
        Doctor {
            doctor_id: id,
            first_name: String::new(),
            last_name: String::new(),
            doctor_name: name.to_string(),
            specialization: String::new(),
            department: String::new(),
        }
    }

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            Target::Visits,
            [
                "visit_id",
                "patient_id",
                "doctor_id",
                "visit_date",
                "symptoms",
                "billing_amount",
            ]
            .iter()
            .map(|h| (*h).to_string())
            .collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn copies_parent_names_and_cleans_fields() {
        let cleaned = clean_visits(
            &raw(&[&["100", "1", "7", "2024-03-01", "dry cough!", "150.75"]]),
            &[patient(1, "John Doe")],
            &[doctor(7, "Dr. Ann Lee")],
        );

        let visit = &cleaned.rows[0];
        assert_eq!(visit.patient_name, "John Doe");
        assert_eq!(visit.doctor_name, "Dr. Ann Lee");
        assert_eq!(visit.symptoms.as_deref(), Some("Dry Cough"));
        assert_eq!(visit.billing_amount.map(|a| a.value()), Some(150.75));
        assert!(visit.visit_date.is_some());
    }

    #[test]
    fn dangling_patient_is_orphaned() {
        let cleaned = clean_visits(
            &raw(&[
                &["100", "1", "7", "", "", ""],
                &["101", "99", "7", "", "", ""],
                &["102", "1", "8", "", "", ""],
            ]),
            &[patient(1, "John Doe")],
            &[doctor(7, "Dr. Ann Lee")],
        );

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.rows[0].visit_id, 100);
        assert_eq!(cleaned.report.orphaned, 2);
        assert_eq!(cleaned.report.dropped(), 2);
    }

    #[test]
    fn any_bad_key_makes_row_invalid() {
        let cleaned = clean_visits(
            &raw(&[&["100", "one", "7", "", "", ""], &["101", "1", "", "", "", ""]]),
            &[patient(1, "John Doe")],
            &[doctor(7, "Dr. Ann Lee")],
        );
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.report.invalid, 2);
    }

    #[test]
    fn first_occurrence_wins_even_with_a_bad_foreign_key() {
        let cleaned = clean_visits(
            &raw(&[&["5", "bad", "7", "", "", ""], &["5", "1", "7", "", "", ""]]),
            &[patient(1, "John Doe")],
            &[doctor(7, "Dr. Ann Lee")],
        );
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.report.duplicates, 1);
        assert_eq!(cleaned.report.invalid, 1);
        assert!(cleaned.report.is_balanced());
    }

    #[test]
    fn negative_amount_and_blank_symptoms_are_absent() {
        let cleaned = clean_visits(
            &raw(&[&["100", "1", "7", "not a date", "  ?? ", "-20"]]),
            &[patient(1, "John Doe")],
            &[doctor(7, "Dr. Ann Lee")],
        );
        let visit = &cleaned.rows[0];
        assert_eq!(visit.billing_amount, None);
        assert_eq!(visit.symptoms, None);
        assert_eq!(visit.visit_date, None);
    }
}
