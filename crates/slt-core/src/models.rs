//! Shared typed models used across extraction, aggregation and storage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Row interchange
// ---------------------------------------------------------------------------

/// One sheet row: column name → cell text, in column order.
pub type Row = IndexMap<String, String>;

/// Build a [`Row`] from borrowed column names.
pub fn row_from<'a, I>(cells: I) -> Row
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    cells
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

/// Cell lookup that treats a missing column as `""`.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One uploaded log file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLog {
    pub file_name: String,
    pub content: String,
}

impl RawLog {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// SHA-256 hex digest of the log content.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Run identifier for a batch: first 16 hex chars of a SHA-256 over every
/// file name and content digest, in input order.
pub fn batch_run_id(logs: &[RawLog]) -> String {
    let mut hasher = Sha256::new();
    for log in logs {
        hasher.update(log.file_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(log.digest().as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

// ---------------------------------------------------------------------------
// Aggregation outputs
// ---------------------------------------------------------------------------

/// A labelled table of string cells, written to the `Yield` sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SummaryTable {
    pub fn new(title: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Cell at (`row`, `column`) by column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// Index of the first row whose first cell equals `label`.
    pub fn find_row(&self, label: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|cells| cells.first().map(String::as_str) == Some(label))
    }

    /// Sheet rows: a title row carrying `Table`, then one row per line keyed
    /// by this table's columns.
    pub fn to_rows(&self) -> Vec<Row> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        let mut header = Row::new();
        header.insert("Table".to_string(), self.title.clone());
        out.push(header);
        for cells in &self.rows {
            let mut row = Row::new();
            row.insert("Table".to_string(), self.title.clone());
            for (column, value) in self.columns.iter().zip(cells) {
                row.insert(column.clone(), value.clone());
            }
            out.push(row);
        }
        out
    }
}

/// Category → value series, the input of one chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub points: Vec<(String, f64)>,
}

impl ChartSeries {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            points: Vec::new(),
        }
    }

    pub fn value(&self, category: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, value)| *value)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let log = RawLog::new("a.log", "hello");
        assert_eq!(log.digest().len(), 64);
        assert_eq!(log.digest(), RawLog::new("b.log", "hello").digest());
    }

    #[test]
    fn run_id_depends_on_names_and_order() {
        let a = RawLog::new("a.log", "x");
        let b = RawLog::new("b.log", "y");
        let forward = batch_run_id(&[a.clone(), b.clone()]);
        assert_eq!(forward.len(), 16);
        assert_ne!(forward, batch_run_id(&[b, a]));
    }

    #[test]
    fn summary_table_rows_carry_title() {
        let mut table = SummaryTable::new("ECO Yield", &["Category", "Count"]);
        table.push(vec!["Failed".into(), "2".into()]);
        assert_eq!(table.get(0, "Count"), Some("2"));
        assert_eq!(table.find_row("Failed"), Some(0));

        let rows = table.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(cell(&rows[0], "Table"), "ECO Yield");
        assert_eq!(cell(&rows[1], "Category"), "Failed");
        assert_eq!(cell(&rows[1], "Missing"), "");
    }
}
