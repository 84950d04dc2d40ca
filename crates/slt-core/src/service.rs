//! Batch service: parse a set of logs, append their rows, and recompute every
//! derived sheet from the full `Merge` history.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::aggregate::tracker::ChipTrackerRow;
use crate::aggregate::{
    build_tracker, cross_tabulate, failure_category_tally, final_yield_summary,
    group_chart_series, tally_bar_series, yield_summary,
};
use crate::classify::binning::PowerMode;
use crate::config::PipelineConfig;
use crate::errors::{SltError, SltResult};
use crate::models::{batch_run_id, row_from, ChartSeries, RawLog, Row, SummaryTable};
use crate::records::merge_row;
use crate::records::pipeline::{parse_all, BatchRows};
use crate::store::{SheetStore, CHART, FORMAT_1, FORMAT_2, MERGE, SLT_TRACKER, YIELD};

pub const CHART_MODE: &str = "Mode";
pub const CHART_CATEGORY: &str = "Category";
pub const CHART_VALUE: &str = "Value";

/// Everything recomputed from the merge rows.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Aggregates {
    #[serde(skip)]
    pub tracker: Vec<ChipTrackerRow>,
    /// ECO yield, SPORT yield, final yield, ECO tally, SPORT tally, cross tab.
    pub tables: Vec<SummaryTable>,
    /// ECO and SPORT group pies.
    pub group_series: Vec<ChartSeries>,
    /// ECO and SPORT failure-category bars.
    pub bar_series: Vec<ChartSeries>,
}

impl Aggregates {
    pub fn from_merge(records: &[Row]) -> SltResult<Self> {
        let tracker = build_tracker(records)?;
        let eco_tally = failure_category_tally(records, PowerMode::Eco);
        let sport_tally = failure_category_tally(records, PowerMode::Sport);
        let (eco_bars, sport_bars) = tally_bar_series(&eco_tally, &sport_tally);

        let tables = vec![
            yield_summary(&tracker, PowerMode::Eco),
            yield_summary(&tracker, PowerMode::Sport),
            final_yield_summary(&tracker),
            eco_tally,
            sport_tally,
            cross_tabulate(records),
        ];
        let group_series = PowerMode::ALL
            .iter()
            .map(|mode| group_chart_series(records, *mode))
            .collect();

        Ok(Self {
            tracker,
            tables,
            group_series,
            bar_series: vec![eco_bars, sport_bars],
        })
    }

    pub fn tracker_rows(&self) -> Vec<Row> {
        self.tracker.iter().map(ChipTrackerRow::to_row).collect()
    }

    pub fn yield_rows(&self) -> Vec<Row> {
        self.tables.iter().flat_map(SummaryTable::to_rows).collect()
    }

    /// `Mode, Category, Value` rows for the group pies.
    pub fn chart_rows(&self) -> Vec<Row> {
        PowerMode::ALL
            .iter()
            .zip(&self.group_series)
            .flat_map(|(mode, series)| {
                series.points.iter().map(move |(category, value)| {
                    row_from([
                        (CHART_MODE, mode.to_string()),
                        (CHART_CATEGORY, category.clone()),
                        (CHART_VALUE, value.to_string()),
                    ])
                })
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub files: usize,
    pub wide_rows: usize,
    pub long_rows: usize,
    pub merge_rows: usize,
    /// Rows in `Merge` after this batch, history included.
    pub merge_total: usize,
    pub tracker_rows: usize,
    #[serde(flatten)]
    pub aggregates: Aggregates,
    pub elapsed_ms: u128,
}

/// Parse `logs`, write their rows to `store` and rebuild the derived sheets.
///
/// Nothing is written unless every log parses.
pub fn process_logs(
    store: &dyn SheetStore,
    logs: &[RawLog],
    config: &PipelineConfig,
) -> SltResult<BatchReport> {
    if logs.is_empty() {
        return Err(SltError::EmptyBatch);
    }
    let started = Instant::now();
    let run_id = batch_run_id(logs);

    let parsed = parse_all(logs, config)?;
    let rows = BatchRows::from_parsed(&parsed);

    store.append(FORMAT_1, &rows.wide)?;
    store.append(FORMAT_2, &rows.long)?;
    store.append(MERGE, &rows.merge)?;

    store.clear(SLT_TRACKER)?;
    store.clear(YIELD)?;

    let merge_history = store.fetch(MERGE)?;
    let aggregates = Aggregates::from_merge(&merge_history)?;
    store.replace(SLT_TRACKER, &aggregates.tracker_rows())?;
    store.append(YIELD, &aggregates.yield_rows())?;
    store.replace(CHART, &aggregates.chart_rows())?;

    let report = BatchReport {
        run_id,
        files: logs.len(),
        wide_rows: rows.wide.len(),
        long_rows: rows.long.len(),
        merge_rows: rows.merge.len(),
        merge_total: merge_history.len(),
        tracker_rows: aggregates.tracker.len(),
        aggregates,
        elapsed_ms: started.elapsed().as_millis(),
    };
    info!(
        run_id = %report.run_id,
        files = report.files,
        merge_total = report.merge_total,
        tracker_rows = report.tracker_rows,
        elapsed_ms = report.elapsed_ms as u64,
        "processed SLT batch"
    );
    Ok(report)
}

/// ECO and SPORT group series for `logs` alone, without touching storage.
pub fn chart_series_for_logs(
    logs: &[RawLog],
    config: &PipelineConfig,
) -> SltResult<Vec<ChartSeries>> {
    if logs.is_empty() {
        return Err(SltError::EmptyBatch);
    }
    let merge: Vec<Row> = parse_all(logs, config)?.iter().map(merge_row).collect();
    Ok(PowerMode::ALL
        .iter()
        .map(|mode| group_chart_series(&merge, *mode))
        .collect())
}
