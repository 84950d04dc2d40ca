//! `Merge` rows: the wide row without per-test columns, plus `Mark Power`.
//!
//! These are the rows the tracker and every summary are built from.

use crate::extract::catalog::{MARKING_ID, MARK_POWER, POWER_MODE};
use crate::models::Row;
use crate::records::wide::{push_groups_and_derived, push_scalars};
use crate::records::ParsedLog;

pub fn merge_row(parsed: &ParsedLog) -> Row {
    let mut row = Row::new();
    push_scalars(&mut row, parsed);
    push_groups_and_derived(&mut row, parsed);
    let mark_power = format!("{}{}", parsed.field(POWER_MODE), parsed.field(MARKING_ID));
    row.insert(MARK_POWER.to_string(), mark_power);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::catalog::{FINAL_BIN, TEST_IDS};
    use crate::models::{cell, RawLog};
    use crate::records::fixtures::{ECO_LOG, X1_LOG};
    use crate::records::parse_log;

    #[test]
    fn merge_row_drops_test_columns() {
        let parsed = parse_log(&RawLog::new("a_ECO.log", ECO_LOG)).unwrap();
        let row = merge_row(&parsed);
        for id in TEST_IDS {
            assert!(!row.contains_key(*id));
            assert!(!row.contains_key(&format!("{id}_grade")));
        }
        assert_eq!(cell(&row, MARK_POWER), "ECOUA-2231_07");
        assert_eq!(row.keys().last().map(String::as_str), Some(MARK_POWER));
    }

    #[test]
    fn x1_merge_row_is_failed_eco() {
        let parsed = parse_log(&RawLog::new("x1.log", X1_LOG)).unwrap();
        let row = merge_row(&parsed);
        assert_eq!(cell(&row, FINAL_BIN), "Failed(ECO)");
        assert_eq!(cell(&row, "Adjacent"), "NO");
        assert_eq!(cell(&row, MARK_POWER), "ECOX1");
    }
}
