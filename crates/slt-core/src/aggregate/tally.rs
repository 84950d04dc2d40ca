//! Failure-category tallies and the failure-mode cross tab over merge rows.

use indexmap::IndexMap;

use crate::aggregate::yields::GRAND_TOTAL;
use crate::classify::binning::{PowerMode, ADJACENT_YES};
use crate::classify::groups::GROUP_PASS;
use crate::extract::catalog::{
    ADJACENT, BANK_RELATED_FAILS, CMCM_COLUMN, FINAL_BIN, LPDDR_COLUMN, NON_BANK_RELATED_FAILS,
    NOT_AVAILABLE, POWER_MODE,
};
use crate::models::{cell, Row, SummaryTable};

pub const COUNT: &str = "Count";
pub const ADJACENT_SUFFIX: &str = " (Adjacent)";
pub const FAILURE_MODES: &str = "Failure Modes";
pub const TOTAL: &str = "Total";

fn in_mode(row: &Row, mode: PowerMode) -> bool {
    PowerMode::parse(cell(row, POWER_MODE)) == Some(mode)
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NOT_AVAILABLE
}

/// Distinct failure strings, bank column first, in first-seen order.
fn failure_keys(records: &[Row]) -> Vec<String> {
    let mut keys: IndexMap<String, ()> = IndexMap::new();
    for column in [BANK_RELATED_FAILS, NON_BANK_RELATED_FAILS] {
        for row in records {
            let value = cell(row, column);
            if !is_placeholder(value) {
                keys.entry(value.to_string()).or_insert(());
            }
        }
    }
    keys.into_keys().collect()
}

/// Per-mode counts of each distinct failure string, then the same counts
/// restricted to rows with adjacent column failures.  Zero rows are dropped.
pub fn failure_category_tally(records: &[Row], mode: PowerMode) -> SummaryTable {
    let keys = failure_keys(records);
    let matches = |row: &Row, key: &str| {
        in_mode(row, mode)
            && (cell(row, BANK_RELATED_FAILS) == key || cell(row, NON_BANK_RELATED_FAILS) == key)
    };

    let mut counts: Vec<(String, usize)> = Vec::with_capacity(keys.len() * 2);
    for key in &keys {
        let n = records.iter().filter(|row| matches(row, key.as_str())).count();
        counts.push((key.clone(), n));
    }
    for key in &keys {
        let n = records
            .iter()
            .filter(|row| matches(row, key.as_str()) && cell(row, ADJACENT) == ADJACENT_YES)
            .count();
        counts.push((format!("{key}{ADJACENT_SUFFIX}"), n));
    }

    let header = format!("Failure_{mode}");
    let mut table = SummaryTable::new(format!("{mode} Failures"), &[header.as_str(), COUNT]);
    let mut total = 0;
    for (label, n) in counts.into_iter().filter(|(_, n)| *n > 0) {
        total += n;
        table.push(vec![label, n.to_string()]);
    }
    table.push(vec![GRAND_TOTAL.to_string(), total.to_string()]);
    table
}

/// The failure modes of the cross tab, in row order.
pub const CROSS_TAB_MODES: &[&str] = &[
    "Bank-related Fails",
    "Adjacent Col Fails",
    "CMCM Func Fails",
    "LPDDR Fails",
    "Passing",
];

fn group_failing(value: &str) -> bool {
    !is_placeholder(value) && value.trim() != GROUP_PASS
}

fn cross_tab_counts(records: &[Row], mode: PowerMode) -> [usize; 5] {
    let count = |pred: fn(&Row) -> bool| {
        records
            .iter()
            .filter(|row| in_mode(row, mode) && pred(row))
            .count()
    };
    [
        count(|row| !is_placeholder(cell(row, BANK_RELATED_FAILS))),
        count(|row| cell(row, ADJACENT) == ADJACENT_YES),
        count(|row| group_failing(cell(row, CMCM_COLUMN))),
        count(|row| group_failing(cell(row, LPDDR_COLUMN))),
        count(|row| cell(row, FINAL_BIN).trim().starts_with("HB")),
    ]
}

/// `{:.1}%` of `total`, or `0%` when the total is zero.
pub fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", count as f64 / total as f64 * 100.0)
    }
}

/// Failure-mode counts for ECO and SPORT with each mode's share of its
/// column total.  The totals row has blank percentage cells.
pub fn cross_tabulate(records: &[Row]) -> SummaryTable {
    let eco = cross_tab_counts(records, PowerMode::Eco);
    let sport = cross_tab_counts(records, PowerMode::Sport);
    let total_eco: usize = eco.iter().sum();
    let total_sport: usize = sport.iter().sum();

    let mut table = SummaryTable::new(
        "Failure Modes",
        &[FAILURE_MODES, "ECO", "SPORT", "ECO %", "SPORT %"],
    );
    for (i, label) in CROSS_TAB_MODES.iter().enumerate() {
        table.push(vec![
            label.to_string(),
            eco[i].to_string(),
            sport[i].to_string(),
            percentage(eco[i], total_eco),
            percentage(sport[i], total_sport),
        ]);
    }
    table.push(vec![
        TOTAL.to_string(),
        total_eco.to_string(),
        total_sport.to_string(),
        String::new(),
        String::new(),
    ]);
    table
}
