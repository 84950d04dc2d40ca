//! Python bindings for the `_slt_core` extension module.
//!
//! Structured results cross the boundary as JSON and are loaded with
//! Python's `json` module on the way out.

use std::collections::BTreeSet;

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use serde::Serialize;

use crate::aggregate::tracker::ChipTrackerRow;
use crate::classify::format;
use crate::classify::groups;
use crate::config::PipelineConfig;
use crate::loader::read_log;
use crate::models::{RawLog, Row};
use crate::records::{self, long_rows, merge_row, wide_row};
use crate::service;
use crate::store::SqliteSheetStore;

fn to_py<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let json_str =
        serde_json::to_string(value).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    let json_module = py.import("json")?;
    json_module
        .call_method1("loads", (json_str,))
        .map(|o| o.into())
}

#[derive(Serialize)]
struct ParsedRows {
    wide: Row,
    long: Vec<Row>,
    merge: Row,
}

/// Parse one log's text into its wide, long and merge rows.
#[pyfunction]
pub fn parse_log(py: Python<'_>, file_name: &str, content: &str) -> PyResult<PyObject> {
    let parsed = records::parse_log(&RawLog::new(file_name, content))?;
    let rows = ParsedRows {
        wide: wide_row(&parsed),
        long: long_rows(&parsed),
        merge: merge_row(&parsed),
    };
    to_py(py, &rows)
}

/// Process log files into the SQLite sheet store at `db_path`.
#[pyfunction]
#[pyo3(signature = (db_path, files, workers=None))]
pub fn process_logs(
    py: Python<'_>,
    db_path: &str,
    files: Vec<String>,
    workers: Option<usize>,
) -> PyResult<PyObject> {
    let mut config = PipelineConfig::from_env();
    if let Some(n) = workers {
        config = config.with_workers(n);
    }
    let logs = files
        .iter()
        .map(read_log)
        .collect::<Result<Vec<_>, _>>()?;

    let report = py.allow_threads(|| {
        let store = SqliteSheetStore::open(db_path)?;
        let report = service::process_logs(&store, &logs, &config)?;
        store.record_run(&report.run_id)?;
        Ok::<_, crate::errors::SltError>(report)
    })?;
    to_py(py, &report)
}

/// Build tracker rows from a JSON array of merge rows.
#[pyfunction]
pub fn build_tracker(py: Python<'_>, rows_json: &str) -> PyResult<PyObject> {
    let rows: Vec<Row> = serde_json::from_str(rows_json)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    let tracker = crate::aggregate::build_tracker(&rows)?;
    let out: Vec<Row> = tracker.iter().map(ChipTrackerRow::to_row).collect();
    to_py(py, &out)
}

/// ECO and SPORT group series for log files, without storage.
#[pyfunction]
pub fn chart_series(py: Python<'_>, files: Vec<String>) -> PyResult<PyObject> {
    let logs = files
        .iter()
        .map(read_log)
        .collect::<Result<Vec<_>, _>>()?;
    let series = service::chart_series_for_logs(&logs, &PipelineConfig::from_env())?;
    to_py(py, &series)
}

#[pyfunction]
pub fn get_failure_count(value: &str) -> usize {
    groups::get_failure_count(value)
}

#[pyfunction]
pub fn format_adjacent_failures(columns: Vec<u64>) -> String {
    let columns: BTreeSet<u64> = columns.into_iter().collect();
    format::format_adjacent_failures(&columns)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("CATALOG_VERSION", crate::extract::catalog::CATALOG_VERSION)?;
    m.add_function(wrap_pyfunction!(parse_log, m)?)?;
    m.add_function(wrap_pyfunction!(process_logs, m)?)?;
    m.add_function(wrap_pyfunction!(build_tracker, m)?)?;
    m.add_function(wrap_pyfunction!(chart_series, m)?)?;
    m.add_function(wrap_pyfunction!(get_failure_count, m)?)?;
    m.add_function(wrap_pyfunction!(format_adjacent_failures, m)?)?;
    Ok(())
}
