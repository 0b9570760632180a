use hcdw_model::{Cleaned, Doctor, RawRecord, RawTable, StageReport, Target};
use tracing::debug_span;

use super::{coerce_keys, dedupe_keyed, finish};
use crate::normalization::{coerce_integer, expand_department, normalize_text};

const TITLE: &str = "Dr.";

/// Cleans raw doctor rows.
pub fn clean_doctors(raw: &RawTable) -> Cleaned<Doctor> {
    let _span = debug_span!("clean_doctors", input = raw.len()).entered();
    let mut report = StageReport::new(Target::Doctors, raw.len());

    let keyed = coerce_keys(raw, &mut report, |record| {
        coerce_integer(record.get("doctor_id"))
    });
    let keyed = dedupe_keyed(keyed, &mut report, |id| *id);

    let rows = keyed
        .into_iter()
        .map(|row| build_doctor(row.keys, &row.record))
        .collect();
    finish(rows, report)
}

fn build_doctor(doctor_id: i64, record: &RawRecord<'_>) -> Doctor {
    let first_name = normalize_text(record.get("first_name"));
    let last_name = normalize_text(record.get("last_name"));
    let doctor_name = format!("{TITLE} {first_name} {last_name}").trim().to_string();
    let department = expand_department(&normalize_text(record.get("department")));
    Doctor {
        doctor_id,
        first_name,
        last_name,
        doctor_name,
        specialization: normalize_text(record.get("specialization")),
        department,
    }
}
