//! SLT core: parses semiconductor system-level-test logs into typed records,
//! bins each chip per power mode, and rolls the records up into a chip
//! tracker, yield tables, failure tallies and chart series.
//!
//! The crate is usable as a plain Rust library; with the `python` feature
//! it also builds the `_slt_core` extension module via PyO3.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod errors;
pub mod extract;
pub mod loader;
pub mod models;
pub mod records;
pub mod service;
pub mod store;

#[cfg(feature = "python")]
pub mod python;

pub use config::PipelineConfig;
pub use errors::{SltError, SltResult};
pub use models::{RawLog, Row};
pub use service::{chart_series_for_logs, process_logs, BatchReport};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// ---------------------------------------------------------------------------
// Top-level Python module: _slt_core
// ---------------------------------------------------------------------------

#[cfg(feature = "python")]
#[pymodule]
fn _slt_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register(m)
}
