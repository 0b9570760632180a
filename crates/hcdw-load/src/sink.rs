//! The persistence sink abstraction.

use hcdw_model::{Diagnosis, Doctor, Patient, RawTable, SilverSet, Target, Visit};

use crate::error::Result;

/// One cleaned entity set on its way to a sink.
#[derive(Debug, Clone, Copy)]
pub enum SilverBatch<'a> {
    Patients(&'a [Patient]),
    Doctors(&'a [Doctor]),
    Visits(&'a [Visit]),
    Diagnosis(&'a [Diagnosis]),
}

impl<'a> SilverBatch<'a> {
    /// Borrows the entity set for `target` out of a silver set.
    pub fn from_silver(silver: &'a SilverSet, target: Target) -> Self {
        match target {
            Target::Patients => Self::Patients(&silver.patients.rows),
            Target::Doctors => Self::Doctors(&silver.doctors.rows),
            Target::Visits => Self::Visits(&silver.visits.rows),
            Target::Diagnosis => Self::Diagnosis(&silver.diagnosis.rows),
        }
    }

    pub fn target(&self) -> Target {
        match self {
            Self::Patients(_) => Target::Patients,
            Self::Doctors(_) => Target::Doctors,
            Self::Visits(_) => Target::Visits,
            Self::Diagnosis(_) => Target::Diagnosis,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Patients(rows) => rows.len(),
            Self::Doctors(rows) => rows.len(),
            Self::Visits(rows) => rows.len(),
            Self::Diagnosis(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A store that silver and bronze tables can be written to.
///
/// Implementations own their connection; the pipeline receives a sink rather
/// than reaching for a global one.
pub trait PersistenceSink {
    /// Short description for logs and summaries.
    fn describe(&self) -> String;

    /// Creates the silver tables if they do not exist.
    fn ensure_schema(&mut self) -> Result<()>;

    fn suspend_foreign_keys(&mut self) -> Result<()>;

    fn restore_foreign_keys(&mut self) -> Result<()>;

    /// Removes every stored row of a silver target.
    fn clear(&mut self, target: Target) -> Result<()>;

    /// Appends a batch to its silver target and returns the rows written.
    fn append(&mut self, batch: SilverBatch<'_>) -> Result<usize>;

    /// Number of rows stored in a silver target.
    fn count(&mut self, target: Target) -> Result<usize>;

    /// Appends a raw table, uncoerced, to its bronze target.
    fn append_raw(&mut self, table: &RawTable) -> Result<usize>;
}

/// Runs `f` with foreign key checks suspended.
///
/// Checks are restored after `f` returns, whatever it returned. An error from
/// restoring takes precedence over the value of `f`.
pub fn with_foreign_keys_suspended<S, T, F>(sink: &mut S, f: F) -> Result<T>
where
    S: PersistenceSink + ?Sized,
    F: FnOnce(&mut S) -> T,
{
    sink.suspend_foreign_keys()?;
    let value = f(sink);
    sink.restore_foreign_keys()?;
    Ok(value)
}
