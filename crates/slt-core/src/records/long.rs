//! `Format 2` rows: one row per `Failures by Test` entry.

use crate::extract::catalog::{test_category, FILE_NAME, MARKING_ID};
use crate::extract::results::{FAIL, PASS};
use crate::models::Row;
use crate::records::ParsedLog;

pub const SLT_TEST: &str = "SLT Test";
pub const BANK_IDS: &str = "Bank Ids";
pub const RESULT: &str = "Result";
pub const TEST_CATEGORIES: &str = "Test Categories";
pub const LONG_POWER_MODE: &str = "Power Mode";
pub const RESULT_TYPE: &str = "Result Type";

/// The record's own mode when it is ECO or SPORT; otherwise guessed from
/// the file name.
pub fn long_power_mode(parsed: &ParsedLog) -> &'static str {
    match parsed.power_mode() {
        Some(mode) => mode.as_str(),
        None if parsed.file_name.contains("ECO") => "ECO",
        None => "SPORT",
    }
}

pub fn long_rows(parsed: &ParsedLog) -> Vec<Row> {
    let power_mode = long_power_mode(parsed);
    parsed
        .failures_by_test
        .iter()
        .map(|(test, payload)| {
            let result = if payload.is_truthy() { FAIL } else { PASS };
            let result_type = if result == PASS { "Pass_0B" } else { "Fail_1B" };
            let mut row = Row::new();
            row.insert(FILE_NAME.to_string(), parsed.file_name.clone());
            row.insert(MARKING_ID.to_string(), parsed.marking_id().to_string());
            row.insert(SLT_TEST.to_string(), test.clone());
            row.insert(BANK_IDS.to_string(), payload.to_string());
            row.insert(RESULT.to_string(), result.to_string());
            row.insert(TEST_CATEGORIES.to_string(), test_category(test).to_string());
            row.insert(LONG_POWER_MODE.to_string(), power_mode.to_string());
            row.insert(RESULT_TYPE.to_string(), result_type.to_string());
            row
        })
        .collect()
}
