//! Failure-group counting, ECO/SPORT binning and cell formatting.

pub mod binning;
pub mod format;
pub mod groups;
