//! Entity cleaners.
//!
//! Each cleaner turns one raw table into a [`Cleaned`] entity set:
//! 1. Coerce the primary key; rows where it fails are dropped as invalid
//! 2. Deduplicate by the coerced primary key (first occurrence wins)
//! 3. Child entities only: coerce the foreign keys, dropping failures as
//!    invalid, then drop rows whose parents did not survive cleaning
//! 4. Normalize fields and compute derived fields
//!
//! Cleaners never fail: every dropped row is accounted for in the
//! [`StageReport`].

mod diagnosis;
mod doctor;
mod patient;
mod visit;

pub use diagnosis::clean_diagnosis;
pub use doctor::clean_doctors;
pub use patient::clean_patients;
pub use visit::clean_visits;

use hcdw_model::{Cleaned, RawRecord, RawTable, StageReport, log_data_enabled, redact_value};
use tracing::{debug, trace};

use crate::dedupe::dedupe_by_key;
use crate::referential::Retained;

/// A raw record whose key columns coerced successfully.
pub(crate) struct Keyed<'a, K> {
    pub row: usize,
    pub keys: K,
    pub record: RawRecord<'a>,
}

fn trace_invalid(report: &StageReport, row: usize, record: &RawRecord<'_>, reason: &str) {
    let values = if log_data_enabled() {
        record.values().join(",")
    } else {
        String::new()
    };
    trace!(
        target_set = %report.target,
        row,
        values = redact_value(&values),
        reason,
        "dropping invalid row"
    );
}

pub(crate) fn coerce_keys<'a, K, F>(
    raw: &'a RawTable,
    report: &mut StageReport,
    coerce: F,
) -> Vec<Keyed<'a, K>>
where
    F: Fn(&RawRecord<'a>) -> Option<K>,
{
    let mut keyed = Vec::with_capacity(raw.len());
    for (row, record) in raw.records().enumerate() {
        match coerce(&record) {
            Some(keys) => keyed.push(Keyed { row, keys, record }),
            None => {
                report.invalid += 1;
                trace_invalid(report, row, &record, "primary key");
            }
        }
    }
    if report.invalid > 0 {
        debug!(
            target_set = %raw.target,
            invalid = report.invalid,
            "dropped rows with uncoercible primary keys"
        );
    }
    keyed
}

/// Coerces the foreign keys of rows that already survived deduplication.
///
/// Runs after [`dedupe_keyed`] so a first occurrence with a bad foreign key
/// still shadows later rows with the same primary key.
pub(crate) fn coerce_foreign_keys<'a, K, F>(
    keyed: Vec<Keyed<'a, i64>>,
    report: &mut StageReport,
    coerce: F,
) -> Vec<Keyed<'a, K>>
where
    F: Fn(i64, &RawRecord<'a>) -> Option<K>,
{
    let before = report.invalid;
    let mut complete = Vec::with_capacity(keyed.len());
    for Keyed { row, keys, record } in keyed {
        match coerce(keys, &record) {
            Some(keys) => complete.push(Keyed { row, keys, record }),
            None => {
                report.invalid += 1;
                trace_invalid(report, row, &record, "foreign key");
            }
        }
    }
    let invalid = report.invalid - before;
    if invalid > 0 {
        debug!(
            target_set = %report.target,
            invalid,
            "dropped rows with uncoercible foreign keys"
        );
    }
    complete
}

pub(crate) fn dedupe_keyed<'a, K, F>(
    keyed: Vec<Keyed<'a, K>>,
    report: &mut StageReport,
    primary: F,
) -> Vec<Keyed<'a, K>>
where
    F: Fn(&K) -> i64,
{
    let (kept, duplicates) = dedupe_by_key(keyed, |row| primary(&row.keys));
    report.duplicates += duplicates;
    if duplicates > 0 {
        debug!(target_set = %report.target, duplicates, "dropped duplicate keys");
    }
    kept
}

pub(crate) fn record_orphans<T>(retained: &Retained<T>, report: &mut StageReport) {
    report.orphaned += retained.dropped;
    for (field, count) in &retained.violations {
        debug!(
            target_set = %report.target,
            field,
            count,
            "dropped rows with dangling reference"
        );
    }
}

pub(crate) fn finish<T>(rows: Vec<T>, mut report: StageReport) -> Cleaned<T> {
    report.output = rows.len();
    debug_assert!(report.is_balanced(), "unbalanced report: {report:?}");
    debug!(
        target_set = %report.target,
        input = report.input,
        output = report.output,
        dropped = report.dropped(),
        "cleaned entity set"
    );
    Cleaned { rows, report }
}
