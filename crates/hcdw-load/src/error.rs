//! Sink error types.

use std::path::{Path, PathBuf};

use hcdw_model::Target;
use thiserror::Error;

/// Errors raised by a persistence sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// SQLite statement or connection failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File system failure.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// DataFrame build, write or read failure.
    #[error("frame: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// Rows reference parent keys that are not stored, or a cleared parent
    /// is still referenced.
    #[error("{count} {target} rows violate foreign key {field}")]
    ForeignKey {
        target: Target,
        field: &'static str,
        count: usize,
    },

    /// The sink refused the write.
    #[error("{target} write rejected: {reason}")]
    Rejected { target: Target, reason: String },
}

impl SinkError {
    pub(crate) fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_message_names_the_field() {
        let err = SinkError::ForeignKey {
            target: Target::Visits,
            field: "patient_id",
            count: 3,
        };
        assert_eq!(err.to_string(), "3 visits rows violate foreign key patient_id");
    }
}
