//! Cleaning stages for the healthcare silver pipeline.
//!
//! This crate turns raw bronze tables into cleaned entity sets:
//!
//! - **normalization**: per-cell text, gender, numeric and date normalization
//! - **cleaners**: per-entity cleaning (key coercion, dedupe, referential filter)
//! - **dedupe**: first-occurrence-wins deduplication
//! - **referential**: dropping child rows whose parents did not survive

mod cleaners;
pub mod dedupe;
pub mod normalization;
pub mod referential;

pub use cleaners::{clean_diagnosis, clean_doctors, clean_patients, clean_visits};
pub use dedupe::dedupe_by_key;
pub use referential::{ParentKeys, Reference, Retained, retain_referenced};
