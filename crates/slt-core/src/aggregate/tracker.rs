//! Chip tracker: one row per Marking Id with its ECO and SPORT verdicts.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::classify::binning::{final_binning, PowerMode};
use crate::errors::{SltError, SltResult};
use crate::extract::catalog::{
    BANK_RELATED_FAILS, FINAL_BIN, MARKING_ID, NON_BANK_RELATED_FAILS, POWER_MODE,
};
use crate::models::{cell, Row};

pub const BINNING_ECO: &str = "Binning_ECO";
pub const BINNING_SPORT: &str = "Binning_SPORT";
pub const FAILURE_REMARKS_ECO: &str = "Failure_Remarks_ECO";
pub const FAILURE_REMARKS_SPORT: &str = "Failure_Remarks_SPORT";
pub const FINAL_BINNING: &str = "Final Binning";

pub const TRACKER_COLUMNS: &[&str] = &[
    MARKING_ID,
    BINNING_ECO,
    BINNING_SPORT,
    FAILURE_REMARKS_ECO,
    FAILURE_REMARKS_SPORT,
    FINAL_BINNING,
];

/// Columns a merge row must carry for the tracker to be built.
pub const REQUIRED_COLUMNS: &[&str] = &[
    MARKING_ID,
    POWER_MODE,
    FINAL_BIN,
    BANK_RELATED_FAILS,
    NON_BANK_RELATED_FAILS,
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChipTrackerRow {
    pub marking_id: String,
    pub binning_eco: String,
    pub binning_sport: String,
    pub failure_remarks_eco: String,
    pub failure_remarks_sport: String,
    pub final_binning: String,
}

impl ChipTrackerRow {
    pub fn binning(&self, mode: PowerMode) -> &str {
        match mode {
            PowerMode::Eco => &self.binning_eco,
            PowerMode::Sport => &self.binning_sport,
        }
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert(MARKING_ID.to_string(), self.marking_id.clone());
        row.insert(BINNING_ECO.to_string(), self.binning_eco.clone());
        row.insert(BINNING_SPORT.to_string(), self.binning_sport.clone());
        row.insert(FAILURE_REMARKS_ECO.to_string(), self.failure_remarks_eco.clone());
        row.insert(FAILURE_REMARKS_SPORT.to_string(), self.failure_remarks_sport.clone());
        row.insert(FINAL_BINNING.to_string(), self.final_binning.clone());
        row
    }

    pub fn from_row(row: &Row) -> Self {
        Self {
            marking_id: cell(row, MARKING_ID).to_string(),
            binning_eco: cell(row, BINNING_ECO).to_string(),
            binning_sport: cell(row, BINNING_SPORT).to_string(),
            failure_remarks_eco: cell(row, FAILURE_REMARKS_ECO).to_string(),
            failure_remarks_sport: cell(row, FAILURE_REMARKS_SPORT).to_string(),
            final_binning: cell(row, FINAL_BINNING).to_string(),
        }
    }
}

pub fn failure_remark(bank: &str, non_bank: &str) -> String {
    format!("Bank Related: {bank}, Non-Bank Related: {non_bank}")
}

/// Every required column must appear in at least one row.
fn check_columns(records: &[Row]) -> SltResult<()> {
    for column in REQUIRED_COLUMNS {
        if !records.iter().any(|row| row.contains_key(*column)) {
            return Err(SltError::MissingColumn {
                column: column.to_string(),
                context: "Merge".to_string(),
            });
        }
    }
    Ok(())
}

/// Pivot merge rows into tracker rows, ordered by first appearance.
///
/// The first row seen for a (Marking Id, power mode) pair wins; later runs
/// of the same chip in the same mode are ignored.
pub fn build_tracker(records: &[Row]) -> SltResult<Vec<ChipTrackerRow>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    check_columns(records)?;

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut chips: IndexMap<String, ChipTrackerRow> = IndexMap::new();

    for row in records {
        let marking_id = cell(row, MARKING_ID);
        let mode_text = cell(row, POWER_MODE).trim().to_uppercase();
        if !seen.insert((marking_id.to_string(), mode_text)) {
            continue;
        }

        let chip = chips
            .entry(marking_id.to_string())
            .or_insert_with(|| ChipTrackerRow {
                marking_id: marking_id.to_string(),
                ..ChipTrackerRow::default()
            });

        let remark = failure_remark(
            cell(row, BANK_RELATED_FAILS),
            cell(row, NON_BANK_RELATED_FAILS),
        );
        match PowerMode::parse(cell(row, POWER_MODE)) {
            Some(PowerMode::Eco) => {
                chip.binning_eco = cell(row, FINAL_BIN).to_string();
                chip.failure_remarks_eco = remark;
            }
            Some(PowerMode::Sport) => {
                chip.binning_sport = cell(row, FINAL_BIN).to_string();
                chip.failure_remarks_sport = remark;
            }
            None => {}
        }
    }

    Ok(chips
        .into_values()
        .map(|mut chip| {
            chip.final_binning = final_binning(&chip.binning_eco, &chip.binning_sport).to_string();
            chip
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row_from;

    fn merge(marking: &str, mode: &str, final_bin: &str) -> Row {
        row_from([
            (MARKING_ID, marking.to_string()),
            (POWER_MODE, mode.to_string()),
            (FINAL_BIN, final_bin.to_string()),
            (BANK_RELATED_FAILS, "Bank-rel(Failed Banks)".to_string()),
            (NON_BANK_RELATED_FAILS, "N/A".to_string()),
        ])
    }

    #[test]
    fn first_row_per_chip_and_mode_wins() {
        let rows = vec![
            merge("C1", "ECO", "HB1(ECO)"),
            merge("C1", "ECO", "Failed(ECO)"),
        ];
        let tracker = build_tracker(&rows).unwrap();
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker[0].binning_eco, "HB1(ECO)");
        assert_eq!(tracker[0].final_binning, "HB1(ECO)");
    }

    #[test]
    fn pivots_both_modes() {
        let rows = vec![
            merge("C2", "SPORT", "Failed(SPORT)"),
            merge("C1", "ECO", "Failed(ECO)"),
            merge("C2", "ECO", "Failed(ECO)"),
        ];
        let tracker = build_tracker(&rows).unwrap();
        let ids: Vec<&str> = tracker.iter().map(|t| t.marking_id.as_str()).collect();
        assert_eq!(ids, ["C2", "C1"]);

        assert_eq!(tracker[0].binning_sport, "Failed(SPORT)");
        assert_eq!(tracker[0].final_binning, "Failed(ECO)");
        assert_eq!(
            tracker[0].failure_remarks_eco,
            "Bank Related: Bank-rel(Failed Banks), Non-Bank Related: N/A"
        );
        assert_eq!(tracker[1].binning_sport, "");
        assert_eq!(tracker[1].failure_remarks_sport, "");
        assert_eq!(tracker[1].final_binning, "Failed(ECO)");
    }

    #[test]
    fn unknown_mode_keeps_chip_with_blank_bins() {
        let tracker = build_tracker(&[merge("C9", "N/A", "N/A")]).unwrap();
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker[0].binning_eco, "");
        assert_eq!(tracker[0].final_binning, "");
    }

    #[test]
    fn missing_column_is_reported() {
        let mut row = merge("C1", "ECO", "HB1(ECO)");
        row.shift_remove(NON_BANK_RELATED_FAILS);
        let err = build_tracker(&[row]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'Non-Bank Related Fails' not found in the Merge sheet."
        );
    }

    #[test]
    fn empty_input_is_empty_tracker() {
        assert!(build_tracker(&[]).unwrap().is_empty());
    }

    #[test]
    fn row_round_trip_keeps_columns() {
        let tracker = build_tracker(&[merge("C1", "ECO", "HB1(ECO)")]).unwrap();
        let row = tracker[0].to_row();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, TRACKER_COLUMNS);
        assert_eq!(ChipTrackerRow::from_row(&row), tracker[0]);
    }
}
