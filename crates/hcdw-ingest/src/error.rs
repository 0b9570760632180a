//! Error types for raw source ingestion.
//!
//! Every variant means a raw source is unavailable; the pipeline treats all of
//! them as fatal before any cleaning starts.

use std::path::PathBuf;

use hcdw_model::Target;
use thiserror::Error;

/// Errors that can occur while reading raw sources.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Data directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file is empty or has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Shape Errors ===
    /// Required key column not found in the raw input.
    #[error("required column '{column}' not found in {target} source")]
    MissingColumn { column: String, target: Target },

    /// No raw table registered for the target (in-memory sources).
    #[error("no raw source registered for {target}")]
    SourceMissing { target: Target },
}

impl IngestError {
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// A raw source that could not be read, tagged with its target.
#[derive(Debug, Error)]
#[error("{target} source unavailable: {source}")]
pub struct SourceUnavailable {
    pub target: Target,
    #[source]
    pub source: IngestError,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/doctors.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/doctors.csv");
    }

    #[test]
    fn test_missing_io_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = IngestError::from_io(std::path::Path::new("x.csv"), io);
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_column_display() {
        let err = IngestError::MissingColumn {
            column: "visit_id".to_string(),
            target: Target::Visits,
        };
        assert_eq!(
            err.to_string(),
            "required column 'visit_id' not found in visits source"
        );
    }
}
