use crate::entity::{Diagnosis, Doctor, Patient, Visit};
use crate::report::{Cleaned, StageReport};
use crate::target::Target;

/// The four cleaned entity sets handed to persistence.
///
/// Every visit references a patient and a doctor in this set, and every
/// diagnosis references a visit in this set.
#[derive(Debug, Clone, PartialEq)]
pub struct SilverSet {
    pub patients: Cleaned<Patient>,
    pub doctors: Cleaned<Doctor>,
    pub visits: Cleaned<Visit>,
    pub diagnosis: Cleaned<Diagnosis>,
}

impl SilverSet {
    /// Stage reports in foreign-key order.
    pub fn reports(&self) -> [StageReport; 4] {
        [
            self.patients.report,
            self.doctors.report,
            self.visits.report,
            self.diagnosis.report,
        ]
    }

    pub fn row_count(&self, target: Target) -> usize {
        match target {
            Target::Patients => self.patients.len(),
            Target::Doctors => self.doctors.len(),
            Target::Visits => self.visits.len(),
            Target::Diagnosis => self.diagnosis.len(),
        }
    }

    pub fn total_rows(&self) -> usize {
        Target::ALL.iter().map(|t| self.row_count(*t)).sum()
    }
}
