use hcdw_model::{Cleaned, Diagnosis, RawRecord, RawTable, StageReport, Target, Visit};
use tracing::debug_span;

use super::{Keyed, coerce_foreign_keys, coerce_keys, dedupe_keyed, finish, record_orphans};
use crate::normalization::{coerce_integer, normalize_text};
use crate::referential::{ParentKeys, Reference, retain_referenced};

#[derive(Debug, Clone, Copy)]
struct DiagnosisKeys {
    diagnosis_id: i64,
    visit_id: i64,
}

fn visit_ref(row: &Keyed<'_, DiagnosisKeys>) -> i64 {
    row.keys.visit_id
}

/// Cleans raw diagnosis rows against the cleaned visit set.
pub fn clean_diagnosis(raw: &RawTable, visits: &[Visit]) -> Cleaned<Diagnosis> {
    let _span = debug_span!("clean_diagnosis", input = raw.len()).entered();
    let mut report = StageReport::new(Target::Diagnosis, raw.len());

    let keyed = coerce_keys(raw, &mut report, |record| {
        coerce_integer(record.get("diagnosis_id"))
    });
    let keyed = dedupe_keyed(keyed, &mut report, |id| *id);
    let keyed = coerce_foreign_keys(keyed, &mut report, |diagnosis_id, record| {
        Some(DiagnosisKeys {
            diagnosis_id,
            visit_id: coerce_integer(record.get("visit_id"))?,
        })
    });

    let visit_keys = ParentKeys::from_entities(visits);
    let retained = retain_referenced(
        keyed,
        &[Reference {
            field: Target::Visits.key_field(),
            parents: &visit_keys,
            key: visit_ref,
        }],
    );
    record_orphans(&retained, &mut report);

    let rows = retained
        .rows
        .into_iter()
        .map(|row| build_diagnosis(row.keys, &row.record))
        .collect();
    finish(rows, report)
}

fn build_diagnosis(keys: DiagnosisKeys, record: &RawRecord<'_>) -> Diagnosis {
    Diagnosis {
        diagnosis_id: keys.diagnosis_id,
        visit_id: keys.visit_id,
        diagnosis: normalize_text(record.get("diagnosis")),
        severity: normalize_text(record.get("severity")),
    }
}
