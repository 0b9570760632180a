//! Referential filtering of child rows against cleaned parent keys.
//!
//! A child row survives only when every foreign key it carries resolves to a
//! parent row that itself survived cleaning. Dangling references are dropped,
//! never repaired.

use std::collections::{BTreeMap, BTreeSet};

use hcdw_model::Entity;

/// Keys of a cleaned parent entity set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentKeys {
    keys: BTreeSet<i64>,
}

impl ParentKeys {
    pub fn from_entities<E: Entity>(rows: &[E]) -> Self {
        rows.iter().map(E::key).collect()
    }

    pub fn contains(&self, key: i64) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<i64> for ParentKeys {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// One foreign key of a child row and the parent keys it must resolve in.
pub struct Reference<'a, T> {
    /// Foreign key column name, for reporting.
    pub field: &'static str,
    pub parents: &'a ParentKeys,
    pub key: fn(&T) -> i64,
}

/// Result of [`retain_referenced`].
#[derive(Debug, Clone, PartialEq)]
pub struct Retained<T> {
    pub rows: Vec<T>,
    /// Rows dropped because at least one reference did not resolve.
    pub dropped: usize,
    /// Unresolved references per foreign key column. A row with two dangling
    /// references counts once in each column but only once in `dropped`.
    pub violations: BTreeMap<&'static str, usize>,
}

/// Keeps rows whose references all resolve.
pub fn retain_referenced<T>(rows: Vec<T>, references: &[Reference<'_, T>]) -> Retained<T> {
    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;
    let mut violations: BTreeMap<&'static str, usize> = BTreeMap::new();
    for row in rows {
        let mut resolved = true;
        for reference in references {
            if !reference.parents.contains((reference.key)(&row)) {
                *violations.entry(reference.field).or_insert(0) += 1;
                resolved = false;
            }
        }
        if resolved {
            kept.push(row);
        } else {
            dropped += 1;
        }
    }
    Retained {
        rows: kept,
        dropped,
        violations,
    }
}
