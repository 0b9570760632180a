//! Pipeline configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then CLI
//! flags, each layer overriding the previous one:
//!
//! ```toml
//! [source]
//! data_dir = "Data"
//!
//! [source.files]
//! patients = "patients.csv"
//!
//! [sink]
//! kind = "sqlite"
//! database = "healthcare_dw.sqlite"
//! output_dir = "silver"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use hcdw_ingest::{CsvDirectorySource, SourceFiles};
use hcdw_load::{CsvSink, PersistenceSink, SinkError, SqliteSink};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = "Data";
const DEFAULT_DATABASE: &str = "healthcare_dw.sqlite";
const DEFAULT_OUTPUT_DIR: &str = "silver";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub source: SourceConfig,
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub data_dir: PathBuf,
    pub files: SourceFiles,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            files: SourceFiles::default(),
        }
    }
}

/// Where silver and bronze tables are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Sqlite,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    pub kind: SinkKind,
    /// SQLite database file.
    pub database: PathBuf,
    /// Output directory of the CSV sink.
    pub output_dir: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            database: PathBuf::from(DEFAULT_DATABASE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl PipelineConfig {
    /// Reads a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Built-in defaults, overridden by `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn raw_source(&self) -> CsvDirectorySource {
        CsvDirectorySource::new(&self.source.data_dir, self.source.files.clone())
    }

    /// Opens the configured sink.
    pub fn open_sink(&self) -> Result<Box<dyn PersistenceSink>, SinkError> {
        Ok(match self.sink.kind {
            SinkKind::Sqlite => Box::new(SqliteSink::open(&self.sink.database)?),
            SinkKind::Csv => Box::new(CsvSink::new(&self.sink.output_dir)),
        })
    }
}
