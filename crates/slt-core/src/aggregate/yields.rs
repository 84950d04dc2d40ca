//! Yield tables over the chip tracker.
//!
//! Grand Total is the sum of the listed categories, not the tracker size:
//! chips whose bin matches none of them are left out of both.

use crate::aggregate::tracker::ChipTrackerRow;
use crate::classify::binning::{FinalBin, PowerMode, HB2_SPORT};
use crate::models::SummaryTable;

pub const SPECIAL_CASE: &str = "Special Case";
pub const GRAND_TOTAL: &str = "Grand Total";
pub const COUNT_COLUMN: &str = "Count of marking ID";
pub const FINAL_BINNING_HEADER: &str = "Final Binning";

/// Human label for a bin, e.g. `Failed (ECO)`.
fn display_label(bin: FinalBin) -> String {
    bin.label().replacen('(', " (", 1)
}

fn summarize(title: String, header: &str, categories: &[(String, usize)]) -> SummaryTable {
    let mut table = SummaryTable::new(title, &[header, COUNT_COLUMN]);
    let mut total = 0;
    for (label, count) in categories {
        total += count;
        table.push(vec![label.clone(), count.to_string()]);
    }
    table.push(vec![GRAND_TOTAL.to_string(), total.to_string()]);
    table
}

/// Failed / HB1 / Special Case counts for one mode's binning column.
pub fn yield_summary(tracker: &[ChipTrackerRow], mode: PowerMode) -> SummaryTable {
    let count = |label: &str| {
        tracker
            .iter()
            .filter(|chip| chip.binning(mode) == label)
            .count()
    };
    let categories = [
        (
            display_label(FinalBin::Failed(mode)),
            count(FinalBin::Failed(mode).label()),
        ),
        (
            display_label(FinalBin::Hb1(mode)),
            count(FinalBin::Hb1(mode).label()),
        ),
        (SPECIAL_CASE.to_string(), count(SPECIAL_CASE)),
    ];
    let header = format!("{mode}-from SLT Tracker");
    summarize(format!("{mode} Yield"), &header, &categories)
}

/// Counts over `Final Binning` for every verdict the tracker can hold.
pub fn final_yield_summary(tracker: &[ChipTrackerRow]) -> SummaryTable {
    let count = |label: &str| {
        tracker
            .iter()
            .filter(|chip| chip.final_binning == label)
            .count()
    };
    let mut categories: Vec<(String, usize)> = [
        FinalBin::Failed(PowerMode::Eco),
        FinalBin::Hb1(PowerMode::Eco),
        FinalBin::Failed(PowerMode::Sport),
        FinalBin::Hb1(PowerMode::Sport),
    ]
    .into_iter()
    .map(|bin| (display_label(bin), count(bin.label())))
    .collect();
    categories.push((SPECIAL_CASE.to_string(), count(SPECIAL_CASE)));
    summarize("Final Yield".to_string(), FINAL_BINNING_HEADER, &categories)
}

/// Chips whose verdict is `HB2(SPORT)`; the final table has no row for them.
pub fn hb2_sport_count(tracker: &[ChipTrackerRow]) -> usize {
    tracker
        .iter()
        .filter(|chip| chip.final_binning == HB2_SPORT)
        .count()
}
