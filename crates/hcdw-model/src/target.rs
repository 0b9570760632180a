//! Entity identity shared by raw sources, cleaners and sinks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four entity sets moved through the pipeline.
///
/// The declaration order is the FK-safe order: every target only references
/// targets declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Patients,
    Doctors,
    Visits,
    Diagnosis,
}

impl Target {
    /// All targets in FK-safe (parent before child) order.
    pub const ALL: [Target; 4] = [
        Target::Patients,
        Target::Doctors,
        Target::Visits,
        Target::Diagnosis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Target::Patients => "patients",
            Target::Doctors => "doctors",
            Target::Visits => "visits",
            Target::Diagnosis => "diagnosis",
        }
    }

    /// Human-readable entity label used in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Target::Patients => "Patient",
            Target::Doctors => "Doctor",
            Target::Visits => "Visit",
            Target::Diagnosis => "Diagnosis",
        }
    }

    pub fn silver_table(self) -> &'static str {
        match self {
            Target::Patients => "silver_patients",
            Target::Doctors => "silver_doctors",
            Target::Visits => "silver_visits",
            Target::Diagnosis => "silver_diagnosis",
        }
    }

    pub fn bronze_table(self) -> &'static str {
        match self {
            Target::Patients => "bronze_patients",
            Target::Doctors => "bronze_doctors",
            Target::Visits => "bronze_visits",
            Target::Diagnosis => "bronze_diagnosis",
        }
    }

    /// Default raw file name for this target.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Target::Patients => "patients.csv",
            Target::Doctors => "doctors.csv",
            Target::Visits => "visits.csv",
            Target::Diagnosis => "diagnosis.csv",
        }
    }

    /// Primary key column.
    pub fn key_field(self) -> &'static str {
        match self {
            Target::Patients => "patient_id",
            Target::Doctors => "doctor_id",
            Target::Visits => "visit_id",
            Target::Diagnosis => "diagnosis_id",
        }
    }

    /// Columns that must be present in the raw input for the target to be usable.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Target::Patients => &["patient_id"],
            Target::Doctors => &["doctor_id"],
            Target::Visits => &["visit_id", "patient_id", "doctor_id"],
            Target::Diagnosis => &["diagnosis_id", "visit_id"],
        }
    }

    /// Targets this one references through foreign keys.
    pub fn parents(self) -> &'static [Target] {
        match self {
            Target::Patients | Target::Doctors => &[],
            Target::Visits => &[Target::Patients, Target::Doctors],
            Target::Diagnosis => &[Target::Visits],
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
