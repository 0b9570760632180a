use hcdw_model::{Cleaned, Patient, RawRecord, RawTable, StageReport, Target};
use tracing::debug_span;

use super::{coerce_keys, dedupe_keyed, finish};
use crate::normalization::{coerce_integer, normalize_gender, normalize_text, parse_date};

const UNKNOWN_CONDITION: &str = "Unknown";

/// Cleans raw patient rows.
pub fn clean_patients(raw: &RawTable) -> Cleaned<Patient> {
    let _span = debug_span!("clean_patients", input = raw.len()).entered();
    let mut report = StageReport::new(Target::Patients, raw.len());

    let keyed = coerce_keys(raw, &mut report, |record| {
        coerce_integer(record.get("patient_id"))
    });
    let keyed = dedupe_keyed(keyed, &mut report, |id| *id);

    let rows = keyed
        .into_iter()
        .map(|row| build_patient(row.keys, &row.record))
        .collect();
    finish(rows, report)
}

fn build_patient(patient_id: i64, record: &RawRecord<'_>) -> Patient {
    let first_name = normalize_text(record.get("first_name"));
    let last_name = normalize_text(record.get("last_name"));
    let patient_name = format!("{first_name} {last_name}").trim().to_string();
    let mut primary_condition = normalize_text(record.get("primary_condition"));
    if primary_condition.is_empty() {
        primary_condition = UNKNOWN_CONDITION.to_string();
    }
    Patient {
        patient_id,
        first_name,
        last_name,
        patient_name,
        date_of_birth: parse_date(record.get("date_of_birth")),
        gender: normalize_gender(record.get("gender")),
        primary_condition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcdw_model::Gender;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            Target::Patients,
            [
                "patient_id",
                "first_name",
                "last_name",
                "date_of_birth",
                "gender",
                "primary_condition",
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
    fn derives_name_and_defaults() {
        let cleaned = clean_patients(&raw(&[&["1", "jo hn", "doe", "1990-04-01", "m", ""]]));

        let patient = &cleaned.rows[0];
        assert_eq!(patient.patient_name, "Jo Hn Doe");
        assert_eq!(patient.gender, Gender::Male);
        assert_eq!(patient.primary_condition, "Unknown");
        assert_eq!(
            patient.date_of_birth,
            chrono::NaiveDate::from_ymd_opt(1990, 4, 1)
        );
    }

    #[test]
    fn name_is_trimmed_when_a_part_is_missing() {
        let cleaned = clean_patients(&raw(&[&["2", "", "roe", "", "", "asthma"]]));
        assert_eq!(cleaned.rows[0].patient_name, "Roe");
        assert_eq!(cleaned.rows[0].primary_condition, "Asthma");
        assert_eq!(cleaned.rows[0].date_of_birth, None);
    }

    #[test]
    fn counts_invalid_and_duplicates() {
        let cleaned = clean_patients(&raw(&[
            &["1", "a", "b", "", "", ""],
            &["x", "c", "d", "", "", ""],
            &["1.0", "e", "f", "", "", ""],
            &["", "g", "h", "", "", ""],
        ]));
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.report.invalid, 2);
        assert_eq!(cleaned.report.duplicates, 1);
        assert_eq!(cleaned.report.output, 1);
        assert!(cleaned.report.is_balanced());
    }
}
