//! In-process sink that records every call.
//!
//! Stores keys and foreign keys only, enforces foreign keys the way a
//! database would, and can be told to reject writes for chosen targets.

use std::collections::{BTreeMap, BTreeSet};

use hcdw_model::{RawTable, Target};

use crate::error::{Result, SinkError};
use crate::sink::{PersistenceSink, SilverBatch};

/// One call made against a [`MemorySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    EnsureSchema,
    SuspendForeignKeys,
    RestoreForeignKeys,
    Clear(Target),
    Append(Target, usize),
    Count(Target),
    AppendRaw(Target, usize),
}

impl SinkCall {
    /// Whether the call changes stored data.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Clear(_) | Self::Append(..) | Self::AppendRaw(..)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ForeignKey {
    field: &'static str,
    parent: Target,
    key: i64,
}

impl ForeignKey {
    /// Foreign keys are named after the key column of the parent they reference.
    fn to(parent: Target, key: i64) -> Self {
        Self {
            field: parent.key_field(),
            parent,
            key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredRow {
    key: i64,
    references: Vec<ForeignKey>,
}

#[derive(Debug)]
pub struct MemorySink {
    foreign_keys: bool,
    tables: BTreeMap<Target, Vec<StoredRow>>,
    bronze: BTreeMap<Target, usize>,
    reject: BTreeSet<Target>,
    calls: Vec<SinkCall>,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            foreign_keys: true,
            tables: BTreeMap::new(),
            bronze: BTreeMap::new(),
            reject: BTreeSet::new(),
            calls: Vec::new(),
        }
    }

    /// Rejects every append to `target`.
    pub fn rejecting(mut self, target: Target) -> Self {
        self.reject.insert(target);
        self
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    pub fn writes(&self) -> Vec<SinkCall> {
        self.calls.iter().copied().filter(SinkCall::is_write).collect()
    }

    pub fn foreign_keys_enforced(&self) -> bool {
        self.foreign_keys
    }

    /// Stored primary keys of a silver target, in insertion order.
    pub fn keys(&self, target: Target) -> Vec<i64> {
        self.tables
            .get(&target)
            .map(|rows| rows.iter().map(|row| row.key).collect())
            .unwrap_or_default()
    }

    pub fn bronze_rows(&self, target: Target) -> usize {
        self.bronze.get(&target).copied().unwrap_or_default()
    }

    /// Rows of `child` that reference a row of `parent`.
    fn references_to(&self, child: Target, parent: Target) -> usize {
        self.tables.get(&child).map_or(0, |rows| {
            rows.iter()
                .flat_map(|row| &row.references)
                .filter(|fk| fk.parent == parent)
                .count()
        })
    }

    fn has_key(&self, target: Target, key: i64) -> bool {
        self.tables
            .get(&target)
            .is_some_and(|rows| rows.iter().any(|row| row.key == key))
    }
}

fn stored_rows(batch: SilverBatch<'_>) -> Vec<StoredRow> {
    match batch {
        SilverBatch::Patients(rows) => rows
            .iter()
            .map(|p| StoredRow {
                key: p.patient_id,
                references: Vec::new(),
            })
            .collect(),
        SilverBatch::Doctors(rows) => rows
            .iter()
            .map(|d| StoredRow {
                key: d.doctor_id,
                references: Vec::new(),
            })
            .collect(),
        SilverBatch::Visits(rows) => rows
            .iter()
            .map(|v| StoredRow {
                key: v.visit_id,
                references: vec![
                    ForeignKey::to(Target::Patients, v.patient_id),
                    ForeignKey::to(Target::Doctors, v.doctor_id),
                ],
            })
            .collect(),
        SilverBatch::Diagnosis(rows) => rows
            .iter()
            .map(|d| StoredRow {
                key: d.diagnosis_id,
                references: vec![ForeignKey::to(Target::Visits, d.visit_id)],
            })
            .collect(),
    }
}

impl PersistenceSink for MemorySink {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.calls.push(SinkCall::EnsureSchema);
        for target in Target::ALL {
            self.tables.entry(target).or_default();
        }
        Ok(())
    }

    fn suspend_foreign_keys(&mut self) -> Result<()> {
        self.calls.push(SinkCall::SuspendForeignKeys);
        self.foreign_keys = false;
        Ok(())
    }

    fn restore_foreign_keys(&mut self) -> Result<()> {
        self.calls.push(SinkCall::RestoreForeignKeys);
        self.foreign_keys = true;
        Ok(())
    }

    fn clear(&mut self, target: Target) -> Result<()> {
        self.calls.push(SinkCall::Clear(target));
        if self.foreign_keys {
            for child in Target::ALL
                .into_iter()
                .filter(|child| child.parents().contains(&target))
            {
                let count = self.references_to(child, target);
                if count > 0 {
                    return Err(SinkError::ForeignKey {
                        target: child,
                        field: target.key_field(),
                        count,
                    });
                }
            }
        }
        self.tables.entry(target).or_default().clear();
        Ok(())
    }

    fn append(&mut self, batch: SilverBatch<'_>) -> Result<usize> {
        let target = batch.target();
        self.calls.push(SinkCall::Append(target, batch.len()));
        if self.reject.contains(&target) {
            return Err(SinkError::Rejected {
                target,
                reason: "configured to reject".to_string(),
            });
        }

        let rows = stored_rows(batch);
        if self.foreign_keys {
            let mut violations: BTreeMap<&'static str, usize> = BTreeMap::new();
            for fk in rows.iter().flat_map(|row| &row.references) {
                if !self.has_key(fk.parent, fk.key) {
                    *violations.entry(fk.field).or_insert(0) += 1;
                }
            }
            if let Some((field, count)) = violations.into_iter().next() {
                return Err(SinkError::ForeignKey {
                    target,
                    field,
                    count,
                });
            }
        }

        let written = rows.len();
        self.tables.entry(target).or_default().extend(rows);
        Ok(written)
    }

    fn count(&mut self, target: Target) -> Result<usize> {
        self.calls.push(SinkCall::Count(target));
        Ok(self.tables.get(&target).map(Vec::len).unwrap_or_default())
    }

    fn append_raw(&mut self, table: &RawTable) -> Result<usize> {
        self.calls.push(SinkCall::AppendRaw(table.target, table.len()));
        if self.reject.contains(&table.target) {
            return Err(SinkError::Rejected {
                target: table.target,
                reason: "configured to reject".to_string(),
            });
        }
        *self.bronze.entry(table.target).or_insert(0) += table.len();
        Ok(table.len())
    }
}
