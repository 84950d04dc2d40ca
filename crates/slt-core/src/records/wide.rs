//! `Format 1` rows: the full catalog, one row per log.

use crate::extract::catalog::{
    grade_column, ADJACENT, ADJACENT_COLUMNS, BANK_RELATED_FAILS, FINAL_BIN, GROUP_COLUMNS,
    NON_BANK_RELATED_FAILS, NOT_AVAILABLE, REMARKS, SCALAR_COLUMNS, TEST_IDS,
};
use crate::models::Row;
use crate::records::ParsedLog;

/// Column order of a wide row.
pub fn wide_columns() -> Vec<String> {
    let mut columns: Vec<String> = SCALAR_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(TEST_IDS.iter().map(|id| id.to_string()));
    columns.extend(TEST_IDS.iter().map(|id| grade_column(id)));
    columns.extend(GROUP_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(derived_columns().iter().map(|c| c.to_string()));
    columns
}

/// Columns computed from the groups and binning, shared with merge rows.
pub(crate) fn derived_columns() -> [&'static str; 6] {
    [
        BANK_RELATED_FAILS,
        NON_BANK_RELATED_FAILS,
        REMARKS,
        ADJACENT_COLUMNS,
        ADJACENT,
        FINAL_BIN,
    ]
}

pub(crate) fn push_scalars(row: &mut Row, parsed: &ParsedLog) {
    for column in SCALAR_COLUMNS {
        row.insert(column.to_string(), parsed.field(column).to_string());
    }
}

pub(crate) fn push_groups_and_derived(row: &mut Row, parsed: &ParsedLog) {
    for column in GROUP_COLUMNS {
        row.insert(column.to_string(), parsed.groups.encoded(column));
    }
    row.insert(BANK_RELATED_FAILS.into(), parsed.bank_related_fails.clone());
    row.insert(NON_BANK_RELATED_FAILS.into(), parsed.non_bank_related_fails.clone());
    row.insert(REMARKS.into(), parsed.remarks.clone());
    row.insert(ADJACENT_COLUMNS.into(), parsed.adjacent_columns.clone());
    row.insert(ADJACENT.into(), parsed.adjacent.to_string());
    row.insert(FINAL_BIN.into(), parsed.final_bin.label().to_string());
}

pub fn wide_row(parsed: &ParsedLog) -> Row {
    let mut row = Row::new();
    push_scalars(&mut row, parsed);
    for id in TEST_IDS {
        let payload = parsed.payloads.get(id).map(String::as_str).unwrap_or(NOT_AVAILABLE);
        row.insert(id.to_string(), payload.to_string());
    }
    for id in TEST_IDS {
        let grade = parsed.grades.get(id).map(String::as_str).unwrap_or(NOT_AVAILABLE);
        row.insert(grade_column(id), grade.to_string());
    }
    push_groups_and_derived(&mut row, parsed);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{cell, RawLog};
    use crate::records::fixtures::ECO_LOG;
    use crate::records::parse_log;

    #[test]
    fn wide_row_follows_column_order() {
        let parsed = parse_log(&RawLog::new("a_ECO.log", ECO_LOG)).unwrap();
        let row = wide_row(&parsed);
        let keys: Vec<String> = row.keys().cloned().collect();
        assert_eq!(keys, wide_columns());
        assert_eq!(row.len(), SCALAR_COLUMNS.len() + 2 * TEST_IDS.len() + GROUP_COLUMNS.len() + 6);
    }

    #[test]
    fn wide_row_carries_payloads_and_grades() {
        let parsed = parse_log(&RawLog::new("a_ECO.log", ECO_LOG)).unwrap();
        let row = wide_row(&parsed);
        assert_eq!(cell(&row, "ATE_CMD_BANK_PE_MACC"), "[3, 17]");
        assert_eq!(cell(&row, "ATE_CMD_BANK_PE_MACC_grade"), "FAIL");
        assert_eq!(cell(&row, "ATE_CMD_DDR_ACK_HO_grade"), NOT_AVAILABLE);
        assert_eq!(cell(&row, "UCM_ALL"), "1f");
        assert_eq!(cell(&row, "LPDDR Test"), "P");
        assert_eq!(cell(&row, FINAL_BIN), "Failed(ECO)");
    }
}
