//! Cleaned (silver) entity types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::target::Target;

/// A cleaned entity with an integer primary key.
pub trait Entity {
    const TARGET: Target;

    fn key(&self) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finite, non-negative billing amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct BillingAmount(f64);

impl BillingAmount {
    /// Returns `None` for negative, NaN or infinite values.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            // -0.0 passes the comparison above
            Some(Self(value.abs()))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for BillingAmount {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("invalid billing amount {value}"))
    }
}

impl From<BillingAmount> for f64 {
    fn from(amount: BillingAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for BillingAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// `first_name last_name`, trimmed.
    pub patient_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub primary_condition: String,
}

impl Entity for Patient {
    const TARGET: Target = Target::Patients;

    fn key(&self) -> i64 {
        self.patient_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// `Dr. first_name last_name`, trimmed.
    pub doctor_name: String,
    pub specialization: String,
    pub department: String,
}

impl Entity for Doctor {
    const TARGET: Target = Target::Doctors;

    fn key(&self) -> i64 {
        self.doctor_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub visit_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: Option<NaiveDate>,
    pub symptoms: Option<String>,
    pub billing_amount: Option<BillingAmount>,
    /// Copied from the referenced patient at cleaning time.
    pub patient_name: String,
    /// Copied from the referenced doctor at cleaning time.
    pub doctor_name: String,
}

impl Entity for Visit {
    const TARGET: Target = Target::Visits;

    fn key(&self) -> i64 {
        self.visit_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub diagnosis_id: i64,
    pub visit_id: i64,
    pub diagnosis: String,
    pub severity: String,
}

impl Entity for Diagnosis {
    const TARGET: Target = Target::Diagnosis;

    fn key(&self) -> i64 {
        self.diagnosis_id
    }
}
