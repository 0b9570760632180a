//! Raw (bronze) records as read from a source, before any coercion.

use crate::target::Target;

/// Snapshot of one raw source: normalized headers plus string cells.
///
/// Headers are stored lower-cased so field lookups are case-insensitive.
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub target: Target,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Builds a table, lower-casing headers and padding or truncating rows to
    /// the header width.
    pub fn new(target: Target, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|header| header.trim().to_ascii_lowercase())
            .collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            target,
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    /// Required columns for this table's target that are missing.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.target
            .required_fields()
            .iter()
            .copied()
            .filter(|field| !self.has_column(field))
            .collect()
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        self.rows.iter().map(move |values| RawRecord {
            headers: &self.headers,
            values,
        })
    }
}

/// Borrowed view of a single raw row.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> RawRecord<'a> {
    /// Returns the cell for `field`, or `None` when the column is missing or
    /// the cell is blank.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        let idx = self
            .headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(field))?;
        let value = self.values.get(idx)?.as_str();
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}
