//! Error types for the SLT core library.

#[cfg(feature = "python")]
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;

use crate::extract::literal::LiteralError;

/// Top-level error enum for the SLT core library.
///
/// Parse-stage variants abort the batch before anything is written;
/// storage-stage variants surface after parsing succeeded.
#[derive(Debug, thiserror::Error)]
pub enum SltError {
    #[error("Error processing file {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Column '{column}' not found in the {context} sheet.")]
    MissingColumn { column: String, context: String },

    #[error("No files uploaded")]
    EmptyBatch,

    #[error("Literal error: {0}")]
    Literal(#[from] LiteralError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SltError {
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        SltError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while turning log text into records.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SltError::Parse { .. } | SltError::Literal(_) | SltError::EmptyBatch
        )
    }
}

#[cfg(feature = "python")]
impl From<SltError> for PyErr {
    fn from(err: SltError) -> PyErr {
        match &err {
            SltError::Parse { .. } | SltError::Literal(_) | SltError::EmptyBatch => {
                PyValueError::new_err(err.to_string())
            }
            SltError::MissingColumn { .. } => PyValueError::new_err(err.to_string()),
            SltError::Io(_) => PyIOError::new_err(err.to_string()),
            SltError::Storage(_) | SltError::Sqlite(_) | SltError::Json(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
        }
    }
}

pub type SltResult<T> = Result<T, SltError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_classified() {
        assert!(SltError::parse("a.log", "boom").is_parse_error());
        assert!(SltError::EmptyBatch.is_parse_error());
        assert!(!SltError::Storage("down".into()).is_parse_error());
        assert!(!SltError::MissingColumn {
            column: "Final Bin".into(),
            context: "Merge".into()
        }
        .is_parse_error());
    }

    #[test]
    fn parse_error_message_names_file() {
        let err = SltError::parse("chip_ECO.log", "bad literal");
        assert_eq!(err.to_string(), "Error processing file chip_ECO.log: bad literal");
    }
}
