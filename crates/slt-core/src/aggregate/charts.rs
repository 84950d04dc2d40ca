//! Category → number series for the pie and bar charts.

use std::sync::LazyLock;

use regex::Regex;

use crate::aggregate::tally::{COUNT, TOTAL};
use crate::aggregate::yields::GRAND_TOTAL;
use crate::classify::binning::PowerMode;
use crate::classify::groups::GROUP_PASS;
use crate::extract::catalog::POWER_MODE;
use crate::models::{cell, ChartSeries, Row, SummaryTable};

/// Group columns in pie-slice order.
pub const CHART_COLUMNS: &[&str] = &[
    "Noc PassThrough",
    "Noc Route",
    "Bank Cram Test",
    "CMCM Functional Tests",
    "UCM_ALL",
    "LPDDR Test",
    "Failed Banks",
];

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Numeric part of a group cell: `"3f"` → 3, `"P"` → 0, no digits → 0.
pub fn chart_value(value: &str) -> u64 {
    let value = value.trim();
    if value.eq_ignore_ascii_case(GROUP_PASS) {
        return 0;
    }
    DIGITS_RE
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Summed group failures for one mode; zero slices are dropped.
pub fn group_chart_series(records: &[Row], mode: PowerMode) -> ChartSeries {
    let rows: Vec<&Row> = records
        .iter()
        .filter(|row| PowerMode::parse(cell(row, POWER_MODE)) == Some(mode))
        .collect();

    let mut series = ChartSeries::new(format!("{mode} Mode - Combined Test Results"));
    for column in CHART_COLUMNS {
        let total: u64 = rows.iter().map(|row| chart_value(cell(row, column))).sum();
        if total > 0 {
            series.points.push((column.to_string(), total as f64));
        }
    }
    series
}

/// One bar series per mode over the union of both tallies' categories.
/// Grand Total rows are left out.
pub fn tally_bar_series(eco: &SummaryTable, sport: &SummaryTable) -> (ChartSeries, ChartSeries) {
    let mut categories: Vec<&str> = Vec::new();
    for table in [eco, sport] {
        for cells in &table.rows {
            if let Some(label) = cells.first().map(String::as_str) {
                if label != GRAND_TOTAL && label != TOTAL && !categories.contains(&label) {
                    categories.push(label);
                }
            }
        }
    }

    let series_for = |title: &str, table: &SummaryTable| {
        let mut series = ChartSeries::new(title);
        for category in &categories {
            let value = table
                .find_row(category)
                .and_then(|row| table.get(row, COUNT))
                .and_then(|count| count.parse::<f64>().ok())
                .unwrap_or(0.0);
            series.points.push((category.to_string(), value));
        }
        series
    };

    (
        series_for("ECO Failures", eco),
        series_for("SPORT Failures", sport),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tally::failure_category_tally;
    use crate::extract::catalog::{
        ADJACENT, BANK_RELATED_FAILS, NON_BANK_RELATED_FAILS,
    };
    use crate::models::row_from;

    fn merge(mode: &str, failed_banks: &str, ucm: &str) -> Row {
        let mut row = row_from([(POWER_MODE, mode.to_string())]);
        for column in CHART_COLUMNS {
            row.insert(column.to_string(), "P".to_string());
        }
        row.insert("Failed Banks".into(), failed_banks.into());
        row.insert("UCM_ALL".into(), ucm.into());
        row
    }

    #[test]
    fn chart_value_parses_counts() {
        assert_eq!(chart_value("3f"), 3);
        assert_eq!(chart_value(" 12F "), 12);
        assert_eq!(chart_value("P"), 0);
        assert_eq!(chart_value("p"), 0);
        assert_eq!(chart_value("N/A"), 0);
    }

    #[test]
    fn group_series_sums_per_mode_and_drops_zeros() {
        let records = vec![
            merge("ECO", "2f", "P"),
            merge("ECO", "1f", "1f"),
            merge("SPORT", "5f", "P"),
        ];
        let eco = group_chart_series(&records, PowerMode::Eco);
        assert_eq!(eco.points.len(), 2);
        assert_eq!(eco.points[0].0, "UCM_ALL");
        assert_eq!(eco.value("Failed Banks"), Some(3.0));
        assert_eq!(eco.value("UCM_ALL"), Some(1.0));
        assert_eq!(eco.value("Noc Route"), None);

        let sport = group_chart_series(&records, PowerMode::Sport);
        assert_eq!(sport.value("Failed Banks"), Some(5.0));
        assert!(group_chart_series(&[], PowerMode::Eco).is_empty());
    }

    #[test]
    fn bar_series_align_categories() {
        let tally_row = |mode: &str, bank: &str| {
            row_from([
                (POWER_MODE, mode.to_string()),
                (BANK_RELATED_FAILS, bank.to_string()),
                (NON_BANK_RELATED_FAILS, "N/A".to_string()),
                (ADJACENT, "NO".to_string()),
            ])
        };
        let records = vec![
            tally_row("ECO", "Bank-rel(Failed Banks)"),
            tally_row("SPORT", "Bank-rel(Bank Cram Test)"),
        ];
        let eco = failure_category_tally(&records, PowerMode::Eco);
        let sport = failure_category_tally(&records, PowerMode::Sport);
        let (eco_bars, sport_bars) = tally_bar_series(&eco, &sport);

        assert_eq!(eco_bars.points.len(), 2);
        assert_eq!(eco_bars.value("Bank-rel(Failed Banks)"), Some(1.0));
        assert_eq!(eco_bars.value("Bank-rel(Bank Cram Test)"), Some(0.0));
        assert_eq!(sport_bars.value("Bank-rel(Bank Cram Test)"), Some(1.0));
        assert_eq!(eco_bars.value(GRAND_TOTAL), None);
    }
}
