use serde::{Deserialize, Serialize};

use crate::target::Target;

/// Row counts for one cleaning stage.
///
/// `invalid` counts rows whose key could not be coerced, `orphaned` counts
/// rows dropped by the referential filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub target: Target,
    pub input: usize,
    pub duplicates: usize,
    pub invalid: usize,
    pub orphaned: usize,
    pub output: usize,
}

impl StageReport {
    pub fn new(target: Target, input: usize) -> Self {
        Self {
            target,
            input,
            duplicates: 0,
            invalid: 0,
            orphaned: 0,
            output: 0,
        }
    }

    pub fn dropped(&self) -> usize {
        self.input.saturating_sub(self.output)
    }

    /// Every input row is accounted for as output or exactly one drop reason.
    pub fn is_balanced(&self) -> bool {
        self.input == self.output + self.duplicates + self.invalid + self.orphaned
    }
}

/// Output of an entity cleaner.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    pub rows: Vec<T>,
    pub report: StageReport,
}

impl<T> Cleaned<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
