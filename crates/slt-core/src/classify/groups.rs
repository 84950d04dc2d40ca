//! Failure-group classification: folds per-test grades into group counters.

use indexmap::IndexMap;

use crate::extract::catalog::{FailureGroup, GroupClass, FAILURE_GROUPS, NOT_AVAILABLE};
use crate::extract::results::FAIL;

pub const GROUP_PASS: &str = "P";

/// `"{n}f"` for n ≥ 1, `"P"` otherwise.
pub fn encode_failure_count(count: usize) -> String {
    if count > 0 {
        format!("{count}f")
    } else {
        GROUP_PASS.to_string()
    }
}

/// Inverse of [`encode_failure_count`].  Total: anything unrecognised is 0.
pub fn get_failure_count(value: &str) -> usize {
    if value == GROUP_PASS {
        return 0;
    }
    match value.strip_suffix('f') {
        Some(number) => number.trim().parse::<usize>().unwrap_or(0),
        None => 0,
    }
}

/// Number of `group` members graded exactly `FAIL`.
pub fn count_group_failures(group: &FailureGroup, grades: &IndexMap<&'static str, String>) -> usize {
    group
        .members
        .iter()
        .filter(|member| grades.get(*member).map(String::as_str) == Some(FAIL))
        .count()
}

/// Failure counts for all seven groups, keyed by record column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSummary {
    counts: IndexMap<&'static str, usize>,
}

impl GroupSummary {
    pub fn from_grades(grades: &IndexMap<&'static str, String>) -> Self {
        let counts = FAILURE_GROUPS
            .iter()
            .map(|group| (group.column, count_group_failures(group, grades)))
            .collect();
        Self { counts }
    }

    pub fn count(&self, column: &str) -> usize {
        self.counts.get(column).copied().unwrap_or(0)
    }

    pub fn encoded(&self, column: &str) -> String {
        encode_failure_count(self.count(column))
    }

    fn failing_labels(&self, class: Option<GroupClass>) -> Vec<&'static str> {
        FAILURE_GROUPS
            .iter()
            .filter(|group| class.is_none_or(|c| group.class == c))
            .filter(|group| self.count(group.column) >= 1)
            .map(|group| group.label)
            .collect()
    }

    /// `Bank-rel(Failed Banks, ...)` or `"N/A"`.
    pub fn bank_related_fails(&self) -> String {
        wrap("Bank-rel", &self.failing_labels(Some(GroupClass::Bank)))
    }

    /// `Non-Bank-rel(UCM, ...)` or `"N/A"`.
    pub fn non_bank_related_fails(&self) -> String {
        wrap("Non-Bank-rel", &self.failing_labels(Some(GroupClass::NonBank)))
    }

    /// Every failing group, bank groups first.  The sheets have always
    /// carried the `Bank-rel` prefix here, for non-bank groups too.
    pub fn remarks(&self) -> String {
        wrap("Bank-rel", &self.failing_labels(None))
    }

    pub fn has_non_bank_failure(&self) -> bool {
        !self.failing_labels(Some(GroupClass::NonBank)).is_empty()
    }
}

fn wrap(prefix: &str, labels: &[&str]) -> String {
    if labels.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{prefix}({})", labels.join(", "))
    }
}
