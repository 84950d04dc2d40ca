//! ECO/SPORT binning and the tracker's final-binning rule.

use std::fmt;

use crate::extract::catalog::{
    ADJACENT, CHIP_VERSION, NON_BANK_RELATED_FAILS, NOT_AVAILABLE, POWER_MODE,
    TOTAL_BANKS_FAILED,
};
use crate::models::{cell, Row};

pub const ADJACENT_YES: &str = "YES";
pub const ADJACENT_NO: &str = "NO";

/// Label the final-binning rule promotes to.  The per-mode binning never
/// emits it; see DESIGN.md.
pub const HB2_SPORT: &str = "HB2(SPORT)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerMode {
    Eco,
    Sport,
}

impl PowerMode {
    /// `trim(upper(value))` must be exactly `ECO` or `SPORT`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ECO" => Some(PowerMode::Eco),
            "SPORT" => Some(PowerMode::Sport),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerMode::Eco => "ECO",
            PowerMode::Sport => "SPORT",
        }
    }

    /// Highest total-banks-failed count that still bins as failed.
    fn failed_threshold(self) -> i64 {
        match self {
            PowerMode::Eco => 2,
            PowerMode::Sport => 5,
        }
    }

    pub const ALL: [PowerMode; 2] = [PowerMode::Eco, PowerMode::Sport];
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinalBin {
    Failed(PowerMode),
    Hb1(PowerMode),
    NotAvailable,
}

impl FinalBin {
    pub fn label(self) -> &'static str {
        match self {
            FinalBin::Failed(PowerMode::Eco) => "Failed(ECO)",
            FinalBin::Failed(PowerMode::Sport) => "Failed(SPORT)",
            FinalBin::Hb1(PowerMode::Eco) => "HB1(ECO)",
            FinalBin::Hb1(PowerMode::Sport) => "HB1(SPORT)",
            FinalBin::NotAvailable => NOT_AVAILABLE,
        }
    }
}

impl fmt::Display for FinalBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The record fields binning looks at.
#[derive(Clone, Copy, Debug)]
pub struct BinInputs<'a> {
    pub power_mode: &'a str,
    pub chip_version: &'a str,
    pub total_banks_failed: &'a str,
    pub adjacent: &'a str,
    pub non_bank_related_fails: &'a str,
}

impl<'a> BinInputs<'a> {
    pub fn from_row(row: &'a Row) -> Self {
        Self {
            power_mode: cell(row, POWER_MODE),
            chip_version: cell(row, CHIP_VERSION),
            total_banks_failed: cell(row, TOTAL_BANKS_FAILED),
            adjacent: cell(row, ADJACENT),
            non_bank_related_fails: cell(row, NON_BANK_RELATED_FAILS),
        }
    }
}

/// Lenient integer coercion: anything unparsable counts as 0.
pub fn coerce_count(value: &str) -> i64 {
    value.trim().parse::<i64>().unwrap_or(0)
}

/// Bin one record under its own power mode.
#[allow(clippy::if_same_then_else)]
pub fn bin(inputs: &BinInputs<'_>) -> FinalBin {
    let Some(mode) = PowerMode::parse(inputs.power_mode) else {
        return FinalBin::NotAvailable;
    };

    if coerce_count(inputs.total_banks_failed) <= mode.failed_threshold() {
        return FinalBin::Failed(mode);
    }
    if inputs.adjacent == ADJACENT_YES {
        return FinalBin::Failed(mode);
    }

    let non_bank = inputs.non_bank_related_fails.trim();
    // A0 and later revisions currently share the same rule.
    if inputs.chip_version.trim() == "A0" {
        if non_bank == NOT_AVAILABLE {
            FinalBin::Failed(mode)
        } else {
            FinalBin::Hb1(mode)
        }
    } else if non_bank == NOT_AVAILABLE {
        FinalBin::Failed(mode)
    } else {
        FinalBin::Hb1(mode)
    }
}

/// Combine a chip's ECO and SPORT bins into its tracker verdict.
///
/// Returns `""` for combinations that need a manual look.
pub fn final_binning(eco: &str, sport: &str) -> &'static str {
    let eco = eco.trim();
    let sport = sport.trim();
    let failed_eco = FinalBin::Failed(PowerMode::Eco).label();

    if eco == FinalBin::Hb1(PowerMode::Eco).label() {
        FinalBin::Hb1(PowerMode::Eco).label()
    } else if eco == failed_eco && sport == HB2_SPORT {
        HB2_SPORT
    } else if eco == failed_eco
        && (sport == FinalBin::Failed(PowerMode::Sport).label() || sport.is_empty())
    {
        failed_eco
    } else {
        ""
    }
}
