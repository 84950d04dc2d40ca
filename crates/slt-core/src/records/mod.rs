//! One parse per log, three row projections.
//!
//! [`parse_log`] runs extraction, group classification, formatting and
//! binning once; [`wide`], [`long`] and [`merge`] only reshape the resulting
//! [`ParsedLog`].

pub mod long;
pub mod merge;
pub mod pipeline;
pub mod wide;

use indexmap::IndexMap;
use tracing::debug;

use crate::classify::binning::{bin, BinInputs, FinalBin, PowerMode};
use crate::classify::format::{
    adjacent_columns, adjacent_flag, bounded_list, classify_remark, format_bank_coordinates,
    format_repair_data,
};
use crate::classify::groups::GroupSummary;
use crate::errors::{SltError, SltResult};
use crate::extract::catalog::{
    BANK_COORDINATES, BOUNDED_LIST_COLUMNS, CHIP_VERSION, COLUMNS_WITH_FAILURES, MARKING_ID,
    NOT_AVAILABLE, POWER_MODE, REMARK, REPAIR_DATA, TOTAL_BANKS_FAILED,
};
use crate::extract::fields::extract_fields;
use crate::extract::literal::Literal;
use crate::extract::results::{extract_failures_by_test, extract_grades, extract_payloads};
use crate::models::RawLog;

pub use long::long_rows;
pub use merge::merge_row;
pub use wide::wide_row;

/// Everything derived from a single log file.
#[derive(Clone, Debug)]
pub struct ParsedLog {
    pub file_name: String,
    /// Scalar columns after display formatting, catalog order.
    pub fields: IndexMap<&'static str, String>,
    pub payloads: IndexMap<&'static str, String>,
    pub grades: IndexMap<&'static str, String>,
    pub groups: GroupSummary,
    pub bank_related_fails: String,
    pub non_bank_related_fails: String,
    pub remarks: String,
    pub adjacent_columns: String,
    pub adjacent: &'static str,
    pub final_bin: FinalBin,
    pub failures_by_test: Vec<(String, Literal)>,
}

impl ParsedLog {
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or(NOT_AVAILABLE)
    }

    pub fn marking_id(&self) -> &str {
        self.field(MARKING_ID)
    }

    pub fn power_mode(&self) -> Option<PowerMode> {
        PowerMode::parse(self.field(POWER_MODE))
    }
}

/// Parse one log.  Only a malformed `Failures by Test` literal is fatal;
/// every other gap degrades to `"N/A"`.
pub fn parse_log(log: &RawLog) -> SltResult<ParsedLog> {
    let text = log.content.as_str();

    let failures_by_test = extract_failures_by_test(text)
        .map_err(|e| SltError::parse(&log.file_name, e.to_string()))?;

    let mut fields = extract_fields(&log.file_name, text);
    let grades = extract_grades(text);
    let payloads = extract_payloads(text);
    let groups = GroupSummary::from_grades(&grades);

    // Adjacency reads the full column list, before it is bounded for display.
    let adjacent_columns = adjacent_columns(&fields[COLUMNS_WITH_FAILURES]);
    let adjacent = adjacent_flag(&adjacent_columns);

    for column in BOUNDED_LIST_COLUMNS {
        if let Some(value) = fields.get_mut(column) {
            *value = bounded_list(value);
        }
    }
    if let Some(value) = fields.get_mut(BANK_COORDINATES) {
        *value = format_bank_coordinates(value);
    }
    if let Some(value) = fields.get_mut(REPAIR_DATA) {
        *value = format_repair_data(value);
    }
    fields.insert(REMARK, classify_remark(text).to_string());

    let bank_related_fails = groups.bank_related_fails();
    let non_bank_related_fails = groups.non_bank_related_fails();
    let remarks = groups.remarks();

    let final_bin = bin(&BinInputs {
        power_mode: &fields[POWER_MODE],
        chip_version: &fields[CHIP_VERSION],
        total_banks_failed: &fields[TOTAL_BANKS_FAILED],
        adjacent,
        non_bank_related_fails: &non_bank_related_fails,
    });

    debug!(
        "parsed {} (marking id {}, final bin {})",
        log.file_name,
        fields[MARKING_ID],
        final_bin
    );

    Ok(ParsedLog {
        file_name: log.file_name.clone(),
        fields,
        payloads,
        grades,
        groups,
        bank_related_fails,
        non_bank_related_fails,
        remarks,
        adjacent_columns,
        adjacent,
        final_bin,
        failures_by_test,
    })
}
