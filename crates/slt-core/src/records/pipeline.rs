//! Batch parsing with Rayon-based parallelism.

use rayon::prelude::*;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::errors::SltResult;
use crate::models::{RawLog, Row};
use crate::records::{long_rows, merge_row, parse_log, wide_row, ParsedLog};

/// Parse every log, keeping input order.
///
/// All files are parsed; the error returned is the first failure in input
/// order, so the outcome does not depend on scheduling.
pub fn parse_all(logs: &[RawLog], config: &PipelineConfig) -> SltResult<Vec<ParsedLog>> {
    if logs.is_empty() {
        return Ok(vec![]);
    }

    let results: Vec<SltResult<ParsedLog>> = if config.parallel && logs.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .build();
        match pool {
            Ok(pool) => pool.install(|| logs.par_iter().map(parse_log).collect()),
            Err(e) => {
                warn!("worker pool unavailable, parsing sequentially: {e}");
                logs.iter().map(parse_log).collect()
            }
        }
    } else {
        logs.iter().map(parse_log).collect()
    };

    results.into_iter().collect()
}

/// The three row shapes for a parsed batch.
#[derive(Clone, Debug, Default)]
pub struct BatchRows {
    pub wide: Vec<Row>,
    pub long: Vec<Row>,
    pub merge: Vec<Row>,
}

impl BatchRows {
    pub fn from_parsed(parsed: &[ParsedLog]) -> Self {
        let mut rows = Self::default();
        for log in parsed {
            rows.wide.push(wide_row(log));
            rows.long.extend(long_rows(log));
            rows.merge.push(merge_row(log));
        }
        rows
    }
}
