//! Persistence for the healthcare silver pipeline.
//!
//! # Features
//!
//! - **Sinks**: [`PersistenceSink`] over SQLite, a CSV directory or memory
//! - **Handoff**: clear-and-append of the silver tables in foreign key order
//! - **Verification**: per-target row counts after a load
//! - **Bronze**: uncoerced raw ingestion into `bronze_*` tables
//!
//! # Example
//!
//! ```ignore
//! use hcdw_load::{SqliteSink, replace_silver, verify_targets};
//!
//! let mut sink = SqliteSink::open("healthcare_dw.sqlite")?;
//! let report = replace_silver(&mut sink, &silver)?;
//! for count in verify_targets(&mut sink) {
//!     println!("{}: {:?}", count.target, count.rows);
//! }
//! ```

mod bronze;
mod csv;
mod error;
mod handoff;
mod memory;
mod sink;
mod sqlite;
mod verify;

// === Error Types ===
pub use error::{Result, SinkError};

// === Sink Abstraction ===
pub use sink::{PersistenceSink, SilverBatch, with_foreign_keys_suspended};

// === Sinks ===
pub use crate::csv::CsvSink;
pub use memory::{MemorySink, SinkCall};
pub use sqlite::SqliteSink;

// === Loads ===
pub use bronze::load_bronze;
pub use handoff::{LoadReport, TargetLoad, TargetOutcome, replace_silver};
pub use verify::{TargetCount, verify_targets};
