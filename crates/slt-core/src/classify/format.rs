//! Display rendering for record cells: bounded lists, adjacency ranges,
//! remark phrases.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::classify::binning::{ADJACENT_NO, ADJACENT_YES};
use crate::extract::catalog::NOT_AVAILABLE;
use crate::extract::literal::{parse_literal, Literal};

pub const LIST_LIMIT: usize = 5;
pub const MORE_SUFFIX: &str = ", +more...";
pub const NO_ADJACENT_FAILURES: &str = "No Adjacent Failures";
pub const NO_REMARK_MATCH: &str = "No match found";

/// Remark phrases, highest priority first.
pub const REMARK_PHRASES: &[&str] = &[
    "More than 2 bad columns. Bad CHIP",
    "passing",
    "BAD CHIP. Below Test failed",
];

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static REPAIR_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+: \[\d+, \d+\]").unwrap());

fn join_bounded(items: &[String]) -> String {
    if items.len() > LIST_LIMIT {
        format!("{}{MORE_SUFFIX}", items[..LIST_LIMIT].join(", "))
    } else {
        items.join(", ")
    }
}

fn passes_through(value: &str) -> bool {
    value == NOT_AVAILABLE || value.trim().is_empty()
}

/// Render a set-like cell as at most five numbers.
///
/// `"N/A"`, empty values and values without any digits are returned as-is.
pub fn bounded_list(value: &str) -> String {
    if passes_through(value) {
        return value.to_string();
    }
    let numbers: Vec<String> = NUMBER_RE
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect();
    if numbers.is_empty() {
        return value.to_string();
    }
    join_bounded(&numbers)
}

/// Every integer in `value`, sorted and deduplicated.
pub fn parse_column_ids(value: &str) -> BTreeSet<u64> {
    NUMBER_RE
        .find_iter(value)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Run-length encode column ids into `"3-5, 9, 12-14"`.
pub fn format_adjacent_failures(columns: &BTreeSet<u64>) -> String {
    let mut iter = columns.iter().copied();
    let Some(first) = iter.next() else {
        return NO_ADJACENT_FAILURES.to_string();
    };

    let mut ranges = Vec::new();
    let (mut start, mut prev) = (first, first);
    for column in iter {
        if column == prev + 1 {
            prev = column;
            continue;
        }
        ranges.push(render_range(start, prev));
        start = column;
        prev = column;
    }
    ranges.push(render_range(start, prev));
    ranges.join(", ")
}

fn render_range(start: u64, end: u64) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// Decode a range string back into column ids.  Malformed pieces are skipped.
pub fn expand_column_ranges(ranges: &str) -> BTreeSet<u64> {
    let mut columns = BTreeSet::new();
    for piece in ranges.split(',') {
        let piece = piece.trim();
        match piece.split_once('-') {
            Some((start, end)) => {
                if let (Ok(start), Ok(end)) = (start.trim().parse::<u64>(), end.trim().parse::<u64>()) {
                    columns.extend(start..=end);
                }
            }
            None => {
                if let Ok(column) = piece.parse::<u64>() {
                    columns.insert(column);
                }
            }
        }
    }
    columns
}

/// `Adjacent Columns Failures` cell from the unbounded `Columns with Failures`.
pub fn adjacent_columns(columns_with_failures: &str) -> String {
    if columns_with_failures == NOT_AVAILABLE {
        return NOT_AVAILABLE.to_string();
    }
    format_adjacent_failures(&parse_column_ids(columns_with_failures))
}

pub fn adjacent_flag(adjacent_columns: &str) -> &'static str {
    if adjacent_columns == NOT_AVAILABLE || adjacent_columns == NO_ADJACENT_FAILURES {
        ADJACENT_NO
    } else {
        ADJACENT_YES
    }
}

/// First remark phrase found verbatim in the log text.
pub fn classify_remark(text: &str) -> &'static str {
    REMARK_PHRASES
        .iter()
        .find(|phrase| text.contains(*phrase))
        .copied()
        .unwrap_or(NO_REMARK_MATCH)
}

/// `[[r, c], ...]` → `"[r, c], [r, c], ..."`, at most five pairs.
pub fn format_bank_coordinates(value: &str) -> String {
    if passes_through(value) {
        return value.to_string();
    }
    match parse_literal(value) {
        Ok(Literal::List(items)) | Ok(Literal::Tuple(items)) => {
            let rendered: Vec<String> = items.iter().map(Literal::to_string).collect();
            join_bounded(&rendered)
        }
        _ => bounded_list(value),
    }
}

/// `3: [4, 5], 40: [6, 11]` → at most five `k: [a, b]` entries.
pub fn format_repair_data(value: &str) -> String {
    if passes_through(value) {
        return value.to_string();
    }
    let entries: Vec<String> = match parse_literal(&format!("{{{value}}}")) {
        Ok(Literal::Dict(pairs)) => pairs
            .iter()
            .map(|(key, payload)| format!("{key}: {payload}"))
            .collect(),
        _ => REPAIR_ENTRY_RE
            .find_iter(value)
            .map(|m| m.as_str().to_string())
            .collect(),
    };
    join_bounded(&entries)
}
