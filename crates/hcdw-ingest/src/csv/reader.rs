//! CSV file reading into raw tables.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use hcdw_model::{RawTable, Target};

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push('_');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file into a [`RawTable`] for `target`.
///
/// The first non-blank row is the header row. Fully blank rows are skipped,
/// short rows are padded, and every cell is kept as a trimmed string.
pub fn read_raw_table(path: &Path, target: Target) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        if headers.is_none() {
            headers = Some(row.iter().map(|value| normalize_header(value)).collect());
            continue;
        }
        rows.push(row);
    }

    let Some(headers) = headers else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    tracing::debug!(
        path = %path.display(),
        %target,
        columns = headers.len(),
        rows = rows.len(),
        "read raw csv"
    );
    Ok(RawTable::new(target, headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Patient ID "), "Patient_ID");
        assert_eq!(normalize_header("\u{feff}visit_id"), "visit_id");
    }

    #[test]
    fn test_read_raw_table_basic() {
        let file = create_temp_csv("patient_id,first_name\n1, jo hn \n2,jane\n");
        let table = read_raw_table(file.path(), Target::Patients).unwrap();

        assert_eq!(table.headers, vec!["patient_id", "first_name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "jo hn"]);
    }

    #[test]
    fn test_read_raw_table_skips_blank_rows_and_pads() {
        let file = create_temp_csv("\u{feff}doctor_id,department\n\n,\n5\n");
        let table = read_raw_table(file.path(), Target::Doctors).unwrap();

        assert_eq!(table.headers, vec!["doctor_id", "department"]);
        assert_eq!(table.rows, vec![vec!["5".to_string(), String::new()]]);
    }

    #[test]
    fn test_read_raw_table_quoted_values() {
        let file = create_temp_csv("diagnosis_id,diagnosis\n1,\"Flu, seasonal\"\n");
        let table = read_raw_table(file.path(), Target::Diagnosis).unwrap();

        assert_eq!(table.rows[0][1], "Flu, seasonal");
    }

    #[test]
    fn test_read_raw_table_empty_file() {
        let file = create_temp_csv("");
        let result = read_raw_table(file.path(), Target::Visits);

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_raw_table_missing_file() {
        let result = read_raw_table(Path::new("/nonexistent/patients.csv"), Target::Patients);

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
