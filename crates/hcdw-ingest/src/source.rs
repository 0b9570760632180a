//! Raw source abstraction and its CSV-directory and in-memory implementations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use hcdw_model::{RawTable, Target};
use serde::{Deserialize, Serialize};

use crate::csv::read_raw_table;
use crate::error::{IngestError, Result};

/// Supplies one raw table per target.
pub trait RawSource {
    /// Reads the raw table for `target`.
    ///
    /// Any error means the source is unavailable for this run.
    fn read(&self, target: Target) -> Result<RawTable>;

    /// Location of the source for `target`, for logs.
    fn describe(&self, target: Target) -> String;
}

/// File names of the raw inputs inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub patients: String,
    pub doctors: String,
    pub visits: String,
    pub diagnosis: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            patients: Target::Patients.default_file_name().to_string(),
            doctors: Target::Doctors.default_file_name().to_string(),
            visits: Target::Visits.default_file_name().to_string(),
            diagnosis: Target::Diagnosis.default_file_name().to_string(),
        }
    }
}

impl SourceFiles {
    pub fn file_name(&self, target: Target) -> &str {
        match target {
            Target::Patients => &self.patients,
            Target::Doctors => &self.doctors,
            Target::Visits => &self.visits,
            Target::Diagnosis => &self.diagnosis,
        }
    }
}

/// Reads `<data_dir>/<file>` CSV files.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    data_dir: PathBuf,
    files: SourceFiles,
}

impl CsvDirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>, files: SourceFiles) -> Self {
        Self {
            data_dir: data_dir.into(),
            files,
        }
    }

    pub fn path_for(&self, target: Target) -> PathBuf {
        self.data_dir.join(self.files.file_name(target))
    }
}

impl RawSource for CsvDirectorySource {
    fn read(&self, target: Target) -> Result<RawTable> {
        if !self.data_dir.is_dir() {
            return Err(IngestError::DirectoryNotFound {
                path: self.data_dir.clone(),
            });
        }
        let table = read_raw_table(&self.path_for(target), target)?;
        ensure_required_columns(&table)?;
        Ok(table)
    }

    fn describe(&self, target: Target) -> String {
        self.path_for(target).display().to_string()
    }
}

/// Raw tables held in memory, keyed by target.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<Target, RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.insert(table.target, table);
        self
    }

    /// Registers a table built from string literals.
    #[must_use]
    pub fn with_rows(self, target: Target, headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers = headers.iter().map(|h| (*h).to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect();
        self.with_table(RawTable::new(target, headers, rows))
    }

    pub fn remove(&mut self, target: Target) -> Option<RawTable> {
        self.tables.remove(&target)
    }
}

impl RawSource for MemorySource {
    fn read(&self, target: Target) -> Result<RawTable> {
        let table = self
            .tables
            .get(&target)
            .cloned()
            .ok_or(IngestError::SourceMissing { target })?;
        ensure_required_columns(&table)?;
        Ok(table)
    }

    fn describe(&self, target: Target) -> String {
        format!("memory:{target}")
    }
}

fn ensure_required_columns(table: &RawTable) -> Result<()> {
    match table.missing_required().first() {
        Some(column) => Err(IngestError::MissingColumn {
            column: (*column).to_string(),
            target: table.target,
        }),
        None => Ok(()),
    }
}
