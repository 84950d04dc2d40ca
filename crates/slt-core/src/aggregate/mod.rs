//! Whole-collection summaries over merge rows: chip tracker, yield tables,
//! failure tallies, cross tab and chart series.

pub mod charts;
pub mod tally;
pub mod tracker;
pub mod yields;

pub use charts::{group_chart_series, tally_bar_series};
pub use tally::{cross_tabulate, failure_category_tally};
pub use tracker::{build_tracker, ChipTrackerRow};
pub use yields::{final_yield_summary, yield_summary};
