//! SQLite persistence sink.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hcdw_model::{BillingAmount, Diagnosis, Doctor, Patient, RawTable, Target, Visit};
use rusqlite::{Connection, Transaction, params, params_from_iter};
use tracing::debug;

use crate::error::Result;
use crate::sink::{PersistenceSink, SilverBatch};

const SILVER_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS silver_patients (
    patient_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    patient_name TEXT NOT NULL,
    date_of_birth TEXT,
    gender TEXT NOT NULL,
    primary_condition TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS silver_doctors (
    doctor_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    doctor_name TEXT NOT NULL,
    specialization TEXT NOT NULL,
    department TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS silver_visits (
    visit_id INTEGER PRIMARY KEY,
    patient_id INTEGER NOT NULL,
    doctor_id INTEGER NOT NULL,
    visit_date TEXT,
    symptoms TEXT,
    billing_amount REAL,
    patient_name TEXT NOT NULL,
    doctor_name TEXT NOT NULL,
    FOREIGN KEY (patient_id) REFERENCES silver_patients (patient_id),
    FOREIGN KEY (doctor_id) REFERENCES silver_doctors (doctor_id)
);
CREATE TABLE IF NOT EXISTS silver_diagnosis (
    diagnosis_id INTEGER PRIMARY KEY,
    visit_id INTEGER NOT NULL,
    diagnosis TEXT NOT NULL,
    severity TEXT NOT NULL,
    FOREIGN KEY (visit_id) REFERENCES silver_visits (visit_id)
);
";

/// Sink backed by a SQLite database with enforced foreign keys.
pub struct SqliteSink {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteSink {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, path })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn ensure_bronze_table(&self, name: &str, headers: &[String]) -> Result<()> {
        let columns = headers
            .iter()
            .map(|header| format!("{} TEXT", quote_ident(header)))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn
            .execute_batch(&format!("CREATE TABLE IF NOT EXISTS {name} ({columns});"))?;

        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({name})"))?;
        let existing = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        for header in headers.iter().filter(|h| !existing.contains(h.as_str())) {
            debug!(table = name, column = %header, "adding bronze column");
            self.conn.execute_batch(&format!(
                "ALTER TABLE {name} ADD COLUMN {} TEXT;",
                quote_ident(header)
            ))?;
        }
        Ok(())
    }
}

impl PersistenceSink for SqliteSink {
    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(SILVER_SCHEMA)?;
        Ok(())
    }

    fn suspend_foreign_keys(&mut self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        Ok(())
    }

    fn restore_foreign_keys(&mut self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    fn clear(&mut self, target: Target) -> Result<()> {
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM {}", target.silver_table()), [])?;
        debug!(%target, deleted, "cleared silver table");
        Ok(())
    }

    fn append(&mut self, batch: SilverBatch<'_>) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let written = match batch {
            SilverBatch::Patients(rows) => insert_patients(&tx, rows)?,
            SilverBatch::Doctors(rows) => insert_doctors(&tx, rows)?,
            SilverBatch::Visits(rows) => insert_visits(&tx, rows)?,
            SilverBatch::Diagnosis(rows) => insert_diagnosis(&tx, rows)?,
        };
        tx.commit()?;
        Ok(written)
    }

    fn count(&mut self, target: Target) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", target.silver_table()),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn append_raw(&mut self, table: &RawTable) -> Result<usize> {
        if table.headers.is_empty() {
            return Ok(0);
        }
        let name = table.target.bronze_table();
        self.ensure_bronze_table(name, &table.headers)?;

        let columns = table
            .headers
            .iter()
            .map(|header| quote_ident(header))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=table.headers.len())
            .map(|idx| format!("?{idx}"))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare(&format!("INSERT INTO {name} ({columns}) VALUES ({placeholders})"))?;
            for row in &table.rows {
                // Blank raw cells are stored as NULL.
                stmt.execute(params_from_iter(
                    row.iter().map(|cell| (!cell.is_empty()).then_some(cell.as_str())),
                ))?;
            }
        }
        tx.commit()?;
        Ok(table.len())
    }
}

fn insert_patients(tx: &Transaction<'_>, rows: &[Patient]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO silver_patients (patient_id, first_name, last_name, patient_name, \
         date_of_birth, gender, primary_condition) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for patient in rows {
        stmt.execute(params![
            patient.patient_id,
            patient.first_name,
            patient.last_name,
            patient.patient_name,
            patient.date_of_birth.map(|date| date.to_string()),
            patient.gender.as_str(),
            patient.primary_condition,
        ])?;
    }
    Ok(rows.len())
}

fn insert_doctors(tx: &Transaction<'_>, rows: &[Doctor]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO silver_doctors (doctor_id, first_name, last_name, doctor_name, \
         specialization, department) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for doctor in rows {
        stmt.execute(params![
            doctor.doctor_id,
            doctor.first_name,
            doctor.last_name,
            doctor.doctor_name,
            doctor.specialization,
            doctor.department,
        ])?;
    }
    Ok(rows.len())
}

fn insert_visits(tx: &Transaction<'_>, rows: &[Visit]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO silver_visits (visit_id, patient_id, doctor_id, visit_date, symptoms, \
         billing_amount, patient_name, doctor_name) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for visit in rows {
        stmt.execute(params![
            visit.visit_id,
            visit.patient_id,
            visit.doctor_id,
            visit.visit_date.map(|date| date.to_string()),
            visit.symptoms,
            visit.billing_amount.map(BillingAmount::value),
            visit.patient_name,
            visit.doctor_name,
        ])?;
    }
    Ok(rows.len())
}

fn insert_diagnosis(tx: &Transaction<'_>, rows: &[Diagnosis]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO silver_diagnosis (diagnosis_id, visit_id, diagnosis, severity) \
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for diagnosis in rows {
        stmt.execute(params![
            diagnosis.diagnosis_id,
            diagnosis.visit_id,
            diagnosis.diagnosis,
            diagnosis.severity,
        ])?;
    }
    Ok(rows.len())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
