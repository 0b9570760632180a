//! Entity model for the healthcare silver pipeline.
//!
//! Holds the cleaned entity types, the [`Target`] identity shared by sources
//! and sinks, the raw record snapshot read from bronze inputs, and the
//! per-stage counters surfaced to the operator.

pub mod entity;
pub mod raw;
pub mod redact;
pub mod report;
pub mod silver;
pub mod target;

pub use entity::{BillingAmount, Diagnosis, Doctor, Entity, Gender, Patient, Visit};
pub use raw::{RawRecord, RawTable};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
pub use report::{Cleaned, StageReport};
pub use silver::SilverSet;
pub use target::Target;
