//! Per-test grades, raw payloads and the `Failures by Test` dictionary.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::extract::catalog::{graded_test_ids, NOT_AVAILABLE, TEST_IDS};
use crate::extract::fields::first_capture;
use crate::extract::literal::{parse_literal, Literal, LiteralError};

pub const PASS: &str = "PASS";
pub const FAIL: &str = "FAIL";

static GRADE_REGEXES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    graded_test_ids()
        .into_iter()
        .map(|id| {
            let pattern = format!(r"Test Name: {} : (PASS|FAIL)", regex::escape(id));
            (id, Regex::new(&pattern).unwrap())
        })
        .collect()
});

static PAYLOAD_REGEXES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TEST_IDS
        .iter()
        .map(|id| {
            let pattern = format!(
                r"{}': (set\(\)|\[.*?\]|\{{.*?\}}|\d+)",
                regex::escape(id)
            );
            (*id, Regex::new(&pattern).unwrap())
        })
        .collect()
});

static FAILURES_BY_TEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Failures by Test:(.*)$").unwrap());

/// PASS/FAIL grade per graded test id; `"N/A"` when no grade line exists.
pub fn extract_grades(text: &str) -> IndexMap<&'static str, String> {
    GRADE_REGEXES
        .iter()
        .map(|(id, re)| {
            let grade = first_capture(re, text).unwrap_or_else(|| NOT_AVAILABLE.to_string());
            (*id, grade)
        })
        .collect()
}

/// Raw diagnostic payload (`set()`, `[..]`, `{..}` or an integer) per test.
pub fn extract_payloads(text: &str) -> IndexMap<&'static str, String> {
    PAYLOAD_REGEXES
        .iter()
        .map(|(id, re)| {
            let payload = first_capture(re, text).unwrap_or_else(|| NOT_AVAILABLE.to_string());
            (*id, payload)
        })
        .collect()
}

/// Parse the last `Failures by Test:` line into `(test id, payload)` pairs.
///
/// No such line yields an empty list.  A line whose payload is not a dict
/// literal is an error: the caller attaches the file name.
pub fn extract_failures_by_test(text: &str) -> Result<Vec<(String, Literal)>, LiteralError> {
    let Some(raw) = FAILURES_BY_TEST_RE
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
    else {
        return Ok(Vec::new());
    };

    match parse_literal(raw)? {
        Literal::Dict(entries) => Ok(entries
            .into_iter()
            .map(|(key, value)| (key.key_text(), value))
            .collect()),
        _ => Err(LiteralError {
            offset: 0,
            message: "Failures by Test payload is not a dict".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Test Name: ATE_CMD_UCM_ALL : FAIL
Test Name: ATE_CMD_DDR_MCU_MEM : PASS
Test Name: ATE_CMD_BANK_PE_ZERO_DETECT : FAIL
{'ATE_CMD_UCM_ALL': [2, 9], 'ATE_CMD_DDR_MCU_MEM': set(), 'ATE_CMD_BANK_PE_ACC': 4}
Failures by Test: {'ATE_CMD_UCM_ALL': [2, 9], 'ATE_CMD_DDR_MCU_MEM': set()}
";

    #[test]
    fn grades_default_to_na() {
        let grades = extract_grades(SAMPLE);
        assert_eq!(grades.len(), graded_test_ids().len());
        assert_eq!(grades["ATE_CMD_UCM_ALL"], FAIL);
        assert_eq!(grades["ATE_CMD_DDR_MCU_MEM"], PASS);
        assert_eq!(grades["ATE_CMD_BANK_PE_ZERO_DETECT"], FAIL);
        assert_eq!(grades["ATE_CMD_DDR_ACK_HO"], NOT_AVAILABLE);
    }

    #[test]
    fn grade_match_is_exact_on_test_id() {
        // PE_NORM must not pick up the PE_NORM_PRIORITY line.
        let grades = extract_grades("Test Name: ATE_CMD_BANK_PE_NORM_PRIORITY : FAIL\n");
        assert_eq!(grades["ATE_CMD_BANK_PE_NORM_PRIORITY"], FAIL);
        assert_eq!(grades["ATE_CMD_BANK_PE_NORM"], NOT_AVAILABLE);
    }

    #[test]
    fn payload_shapes() {
        let payloads = extract_payloads(SAMPLE);
        assert_eq!(payloads.len(), TEST_IDS.len());
        assert_eq!(payloads["ATE_CMD_UCM_ALL"], "[2, 9]");
        assert_eq!(payloads["ATE_CMD_DDR_MCU_MEM"], "set()");
        assert_eq!(payloads["ATE_CMD_BANK_PE_ACC"], "4");
        assert_eq!(payloads["ATE_CMD_DDR_ACK_FS"], NOT_AVAILABLE);
    }

    #[test]
    fn failures_by_test_parsed_in_order() {
        let failures = extract_failures_by_test(SAMPLE).unwrap();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].0, "ATE_CMD_UCM_ALL");
        assert!(failures[0].1.is_truthy());
        assert_eq!(failures[1].0, "ATE_CMD_DDR_MCU_MEM");
        assert!(!failures[1].1.is_truthy());
    }

    #[test]
    fn failures_by_test_absent_is_empty() {
        assert!(extract_failures_by_test("no summary").unwrap().is_empty());
    }

    #[test]
    fn failures_by_test_malformed_is_error() {
        assert!(extract_failures_by_test("Failures by Test: {'A': [1, 2}\n").is_err());
        assert!(extract_failures_by_test("Failures by Test: [1, 2]\n").is_err());
    }
}
