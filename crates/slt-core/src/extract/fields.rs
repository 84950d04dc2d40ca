//! Scalar field extraction from raw log text.
//!
//! Each catalog pattern is searched once over the whole text; the first
//! match's first capture is the value.  Anything unmatched stays `"N/A"`,
//! which is ordinary degraded output rather than an error.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::extract::catalog::{FIELD_PATTERNS, FILE_NAME, NOT_AVAILABLE, SCALAR_COLUMNS};

static FIELD_REGEXES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FIELD_PATTERNS
        .iter()
        .map(|(column, pattern)| (*column, Regex::new(pattern).unwrap()))
        .collect()
});

/// First capture group of `re` in `text`, if any.
pub fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract every scalar column, in catalog order.
///
/// `File Name` is taken from `file_name`; `Remark` is left `"N/A"` here and
/// filled by the formatter.
pub fn extract_fields(file_name: &str, text: &str) -> IndexMap<&'static str, String> {
    let mut fields: IndexMap<&'static str, String> = SCALAR_COLUMNS
        .iter()
        .map(|column| (*column, NOT_AVAILABLE.to_string()))
        .collect();
    fields.insert(FILE_NAME, file_name.to_string());

    for (column, re) in FIELD_REGEXES.iter() {
        if let Some(value) = first_capture(re, text) {
            fields.insert(column, value);
        }
    }
    fields
}
