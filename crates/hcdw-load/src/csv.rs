//! CSV directory sink backed by polars frames.
//!
//! Every target is one file in the output directory (`silver_<entity>.csv` or
//! `bronze_<entity>.csv`). Appends add rows to the file and write the header
//! only when the file is new; raw rows appended to an existing bronze file are
//! laid out in that file's column order. Foreign keys are not enforced.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hcdw_model::{BillingAmount, RawTable, Target};
use polars::prelude::*;
use tracing::debug;

use crate::error::{Result, SinkError};
use crate::sink::{PersistenceSink, SilverBatch};

/// Sink writing one CSV file per target.
#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn silver_path(&self, target: Target) -> PathBuf {
        self.output_dir
            .join(format!("{}.csv", target.silver_table()))
    }

    pub fn bronze_path(&self, target: Target) -> PathBuf {
        self.output_dir
            .join(format!("{}.csv", target.bronze_table()))
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| SinkError::io("create directory", &self.output_dir, e))
    }
}

impl PersistenceSink for CsvSink {
    fn describe(&self) -> String {
        format!("csv:{}", self.output_dir.display())
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.ensure_dir()
    }

    fn suspend_foreign_keys(&mut self) -> Result<()> {
        Ok(())
    }

    fn restore_foreign_keys(&mut self) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self, target: Target) -> Result<()> {
        let path = self.silver_path(target);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(%target, path = %path.display(), "removed silver file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SinkError::io("remove", &path, e)),
        }
    }

    fn append(&mut self, batch: SilverBatch<'_>) -> Result<usize> {
        self.ensure_dir()?;
        let mut frame = silver_frame(batch)?;
        append_frame(&self.silver_path(batch.target()), &mut frame)?;
        Ok(frame.height())
    }

    fn count(&mut self, target: Target) -> Result<usize> {
        count_rows(&self.silver_path(target))
    }

    fn append_raw(&mut self, table: &RawTable) -> Result<usize> {
        self.ensure_dir()?;
        let path = self.bronze_path(table.target);
        let columns = match existing_header(&path)? {
            Some(header) => align_to_header(table, header, &path)?,
            None => table.headers.clone(),
        };
        let mut frame = raw_frame(table, &columns)?;
        append_frame(&path, &mut frame)?;
        Ok(table.len())
    }
}

fn silver_frame(batch: SilverBatch<'_>) -> PolarsResult<DataFrame> {
    let columns = match batch {
        SilverBatch::Patients(rows) => vec![
            Series::new(
                "patient_id".into(),
                rows.iter().map(|p| p.patient_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "first_name".into(),
                rows.iter().map(|p| p.first_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "last_name".into(),
                rows.iter().map(|p| p.last_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "patient_name".into(),
                rows.iter().map(|p| p.patient_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "date_of_birth".into(),
                rows.iter()
                    .map(|p| p.date_of_birth.map(|date| date.to_string()))
                    .collect::<Vec<_>>(),
            ),
            Series::new(
                "gender".into(),
                rows.iter().map(|p| p.gender.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "primary_condition".into(),
                rows.iter()
                    .map(|p| p.primary_condition.as_str())
                    .collect::<Vec<_>>(),
            ),
        ],
        SilverBatch::Doctors(rows) => vec![
            Series::new(
                "doctor_id".into(),
                rows.iter().map(|d| d.doctor_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "first_name".into(),
                rows.iter().map(|d| d.first_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "last_name".into(),
                rows.iter().map(|d| d.last_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "doctor_name".into(),
                rows.iter().map(|d| d.doctor_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "specialization".into(),
                rows.iter()
                    .map(|d| d.specialization.as_str())
                    .collect::<Vec<_>>(),
            ),
            Series::new(
                "department".into(),
                rows.iter().map(|d| d.department.as_str()).collect::<Vec<_>>(),
            ),
        ],
        SilverBatch::Visits(rows) => vec![
            Series::new(
                "visit_id".into(),
                rows.iter().map(|v| v.visit_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "patient_id".into(),
                rows.iter().map(|v| v.patient_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "doctor_id".into(),
                rows.iter().map(|v| v.doctor_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "visit_date".into(),
                rows.iter()
                    .map(|v| v.visit_date.map(|date| date.to_string()))
                    .collect::<Vec<_>>(),
            ),
            Series::new(
                "symptoms".into(),
                rows.iter().map(|v| v.symptoms.clone()).collect::<Vec<_>>(),
            ),
            Series::new(
                "billing_amount".into(),
                rows.iter()
                    .map(|v| v.billing_amount.map(BillingAmount::value))
                    .collect::<Vec<_>>(),
            ),
            Series::new(
                "patient_name".into(),
                rows.iter().map(|v| v.patient_name.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "doctor_name".into(),
                rows.iter().map(|v| v.doctor_name.as_str()).collect::<Vec<_>>(),
            ),
        ],
        SilverBatch::Diagnosis(rows) => vec![
            Series::new(
                "diagnosis_id".into(),
                rows.iter().map(|d| d.diagnosis_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "visit_id".into(),
                rows.iter().map(|d| d.visit_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "diagnosis".into(),
                rows.iter().map(|d| d.diagnosis.as_str()).collect::<Vec<_>>(),
            ),
            Series::new(
                "severity".into(),
                rows.iter().map(|d| d.severity.as_str()).collect::<Vec<_>>(),
            ),
        ],
    };
    DataFrame::new(columns.into_iter().map(IntoColumn::into_column).collect())
}

/// Header of an existing, non-empty CSV file.
fn existing_header(path: &Path) -> Result<Option<Vec<String>>> {
    if fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true) {
        return Ok(None);
    }
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(Some(
        frame
            .get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
    ))
}

/// Columns to write so appended rows line up with the file's header.
///
/// Columns missing from the raw table are written empty. A raw column the
/// file does not have cannot be added to an existing CSV, so it is rejected.
fn align_to_header(table: &RawTable, header: Vec<String>, path: &Path) -> Result<Vec<String>> {
    let unknown: Vec<&str> = table
        .headers
        .iter()
        .filter(|column| !header.contains(column))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(SinkError::Rejected {
            target: table.target,
            reason: format!(
                "columns {} are not in the header of {}",
                unknown.join(", "),
                path.display()
            ),
        });
    }
    Ok(header)
}

fn raw_frame(table: &RawTable, columns: &[String]) -> PolarsResult<DataFrame> {
    let columns = columns
        .iter()
        .map(|name| {
            let idx = table.headers.iter().position(|header| header == name);
            let values: Vec<Option<&str>> = table
                .rows
                .iter()
                .map(|row| {
                    idx.and_then(|idx| row.get(idx))
                        .map(String::as_str)
                        .filter(|cell| !cell.is_empty())
                })
                .collect();
            Series::new(name.as_str().into(), values).into_column()
        })
        .collect();
    DataFrame::new(columns)
}

fn append_frame(path: &Path, frame: &mut DataFrame) -> Result<()> {
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SinkError::io("open", path, e))?;
    CsvWriter::new(&mut file)
        .include_header(is_new)
        .finish(frame)?;
    debug!(path = %path.display(), rows = frame.height(), "appended frame");
    Ok(())
}

fn count_rows(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    // Schema inference is disabled so every column reads back as text.
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(frame.height())
}
