//! Raw source ingestion for the healthcare silver pipeline.
//!
//! This crate reads the raw (bronze) patient, doctor, visit and diagnosis
//! extracts into [`RawTable`](hcdw_model::RawTable)s of untyped string cells.
//!
//! # Features
//!
//! - **CSV Loading**: Read CSV files with header normalization and blank-row skipping
//! - **Sources**: [`RawSource`] over a CSV data directory or in-memory tables
//! - **Snapshots**: Read all four targets up front, failing as a whole
//!
//! # Example
//!
//! ```ignore
//! use hcdw_ingest::{CsvDirectorySource, SourceFiles, read_snapshot};
//!
//! let source = CsvDirectorySource::new("Data", SourceFiles::default());
//! let snapshot = read_snapshot(&source)?;
//! println!("{} raw rows", snapshot.total_rows());
//! ```

mod csv;
mod error;
mod snapshot;
mod source;

// === Error Types ===
pub use error::{IngestError, Result, SourceUnavailable};

// === CSV Reading ===
pub use crate::csv::read_raw_table;

// === Sources ===
pub use source::{CsvDirectorySource, MemorySource, RawSource, SourceFiles};

// === Snapshots ===
pub use snapshot::{RawSnapshot, read_snapshot};
