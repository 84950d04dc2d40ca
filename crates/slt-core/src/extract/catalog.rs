//! The versioned extraction catalog: scalar field patterns, test ids,
//! failure groups and the test → category lookup.
//!
//! Every record shape (wide, long, merge) is a projection of this one
//! catalog, so a firmware change is a single edit here.

/// Bumped whenever a pattern, test id or group membership changes.
pub const CATALOG_VERSION: i64 = 1;

pub const NOT_AVAILABLE: &str = "N/A";

// -- Column names referenced by the pipeline --------------------------------

pub const FILE_NAME: &str = "File Name";
pub const MARKING_ID: &str = "Marking Id";
pub const CHIP_VERSION: &str = "Chip Version";
pub const POWER_MODE: &str = "Current Power Mode";
pub const BANKS_FAILED: &str = "Banks Failed";
pub const COLUMNS_WITH_FAILURES: &str = "Columns with Failures";
pub const BANK_COORDINATES: &str = "Bank Co-ordinates with Failures";
pub const BANKS_REPAIRABLE: &str = "Banks Repairable after CRAM test";
pub const BANKS_FAILED_AFTER_CRAM: &str = "Banks Failed after CRAM Test";
pub const REPAIR_DATA: &str = "Repair Data Applied";
pub const REMARK: &str = "Remark";
pub const TOTAL_BANKS_FAILED: &str = "Total Banks Failed";

pub const BANK_RELATED_FAILS: &str = "Bank Related Fails";
pub const NON_BANK_RELATED_FAILS: &str = "Non-Bank Related Fails";
pub const REMARKS: &str = "Remarks";
pub const ADJACENT_COLUMNS: &str = "Adjacent Columns Failures";
pub const ADJACENT: &str = "Adjacent";
pub const FINAL_BIN: &str = "Final Bin";
pub const MARK_POWER: &str = "Mark Power";

/// Scalar columns in output order.  `File Name` comes from the upload and
/// `Remark` from phrase classification; every other column has a pattern.
pub const SCALAR_COLUMNS: &[&str] = &[
    FILE_NAME,
    "Timestamp",
    "Chip Number",
    MARKING_ID,
    CHIP_VERSION,
    "SLT Test Version",
    "Current Frequency",
    POWER_MODE,
    "VDDP",
    "VDDM",
    "VDDCORE",
    "VDDHF",
    "VDDIO",
    "VDDWL",
    BANKS_FAILED,
    COLUMNS_WITH_FAILURES,
    BANK_COORDINATES,
    BANKS_REPAIRABLE,
    BANKS_FAILED_AFTER_CRAM,
    REPAIR_DATA,
    REMARK,
    TOTAL_BANKS_FAILED,
];

/// (column, pattern) pairs; the first capture group is the value.
pub const FIELD_PATTERNS: &[(&str, &str)] = &[
    ("Timestamp", r"curr_time=(\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2})"),
    ("Chip Number", r"chip_id=([\w\d\.]+)"),
    (MARKING_ID, r"Marking ID: ([\w\d\-_]+)"),
    (CHIP_VERSION, r"Chip version: ([\w\d]+)"),
    ("SLT Test Version", r"Diagnostic fw version: (v[\d\.]+)"),
    (
        "Current Frequency",
        r"ctUtilsPower : INFO : Current Frequency: (\d+)",
    ),
    (POWER_MODE, r"ctUtilsPower : INFO : Current Power Mode: (\w+)"),
    ("VDDP", r"VDDP: (\d+)"),
    ("VDDM", r"VDDM: (\d+)"),
    ("VDDCORE", r"VDDCORE: (\d+)"),
    ("VDDHF", r"VDDHF: (\d+)"),
    ("VDDIO", r"VDDIO: (\d+)"),
    ("VDDWL", r"VDDWL: (\d+)"),
    (BANKS_FAILED, r"Banks Failed: \{([\d, ]+)\}"),
    (COLUMNS_WITH_FAILURES, r"Columns with failures: \{([\d, ]+)\}"),
    (
        BANKS_REPAIRABLE,
        r"Banks Repairable after CRAM test: \{([\d, ]+)\}",
    ),
    (
        BANKS_FAILED_AFTER_CRAM,
        r"Banks Failed after CRAM [Tt]est:\s*\{([\d, ]+)\}",
    ),
    (REPAIR_DATA, r"Repair Data Applied: \{(.*?)\}"),
    (TOTAL_BANKS_FAILED, r"Total Numbers of Banks Failed: (\d+)"),
    (
        BANK_COORDINATES,
        r"Bank Coordinates with failures:\s*(\[\[.*?\]\])",
    ),
];

/// Columns whose values are set-like and get bounded rendering.
pub const BOUNDED_LIST_COLUMNS: &[&str] = &[
    BANKS_FAILED,
    COLUMNS_WITH_FAILURES,
    BANKS_REPAIRABLE,
    BANKS_FAILED_AFTER_CRAM,
];

/// Test ids carried as payload and grade columns on the wide record.
pub const TEST_IDS: &[&str] = &[
    "ATE_CMD_BANK_PE_ALL_REG_ACCESS",
    "ATE_CMD_BANK_PE_MACC",
    "ATE_CMD_BANK_PE_MULT5X5",
    "ATE_CMD_BANK_PE_ACC",
    "ATE_CMD_BANK_PE_ROTATE",
    "ATE_CMD_BANK_PE_NORM_PRIORITY",
    "ATE_CMD_BANK_PE_GEMV_FP8",
    "ATE_CMD_BANK_PE_GEMV_FP8_SFP16",
    "ATE_CMD_BANK_PE_GEMV_SFP16",
    "ATE_CMD_BANK_PE_GEMV_INT4",
    "ATE_CMD_BANK_PE_GEMV_INT8",
    "ATE_CMD_BANK_PE_ROW_REDUCE",
    "ATE_CMD_BANK_PE_NORM_REDUCE_ADDER",
    "ATE_CMD_BANK_PE_NORM_BYTEADDER_SHIFT_PRIO",
    "ATE_CMD_BANK_PE_GEMV_BROADCAST",
    "ATE_CMD_BANK_PE_GEMV_SPARSITY",
    "ATE_CMD_BANK_PE_NORM_DATA_MUX",
    "ATE_CMD_BANK_GEMV_HALF_ZERO",
    "ATE_CMD_BANK_PE_NORM",
    "ATE_CMD_BANK_NOC_PERECV_STORE_FRWD_NS",
    "ATE_CMD_BANK_NOC_PERECV_STORE_FRWD_SN",
    "ATE_CMD_BANK_NOC_PASSTHROUGH_N",
    "ATE_CMD_BANK_NOC_PASSTHROUGH_S",
    "ATE_CMD_BANK_NOC_PASSTHROUGH_W",
    "ATE_CMD_BANK_NOC_ROUTE_N",
    "ATE_CMD_BANK_NOC_ROUTE_S",
    "ATE_CMD_BANK_NOC_ROUTE_W",
    "ATE_CMD_BANK_NOC_BUFFER",
    "ATE_CMD_BANK_CRAM_BIST_10N",
    "ATE_CMD_BANK_CRAM_BIST_FULL",
    "ATE_CMD_BANK_CRAM_BIST_B2B",
    "ATE_CMD_BANK_CRAM_BIST_BURST",
    "ATE_CMD_CMCM_ALL_FUNCTIONAL",
    "ATE_CMD_UCM_ALL",
    "ATE_CMD_PCM_BANK_IDC_PING_S",
    "ATE_CMD_DDR_APB_ACCESS",
    "ATE_CMD_DDR_MCU_MEM",
    "ATE_CMD_DDR_ACK_HO",
    "ATE_CMD_DDR_ACK_FS",
    "ATE_CMD_DDR_PHYINIT_TRAIN_NORTH",
    "ATE_CMD_DDR_PHYINIT_ALL_NORTH_WR_RD",
    "ATE_CMD_DDR_MEM_SWP_WRRD_N",
    "ATE_CMD_DDR_MEM_SWP_RDLOOP_N",
    "ATE_CMD_DDR_PHYINIT_TRAIN_EAST",
    "ATE_CMD_DDR_PHYINIT_ALL_EAST_WR_RD",
    "ATE_CMD_DDR_MEM_SWP_WRRD_E",
    "ATE_CMD_DDR_MEM_SWP_RDLOOP_E",
    "ATE_CMD_DDR_PHYINIT_FULL",
];

/// Suffix appended to a test id to name its PASS/FAIL column.
pub const GRADE_SUFFIX: &str = "_grade";

pub fn grade_column(test_id: &str) -> String {
    format!("{test_id}{GRADE_SUFFIX}")
}

// -- Failure groups ---------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupClass {
    Bank,
    NonBank,
}

#[derive(Clone, Copy, Debug)]
pub struct FailureGroup {
    /// Record column holding the `"{n}f"` / `"P"` counter.
    pub column: &'static str,
    /// Name used inside the `Bank-rel(...)` / `Non-Bank-rel(...)` remarks.
    pub label: &'static str,
    pub class: GroupClass,
    pub members: &'static [&'static str],
}

/// Groups in remark order: bank groups first, then non-bank.
pub const FAILURE_GROUPS: &[FailureGroup] = &[
    FailureGroup {
        column: "Failed Banks",
        label: "Failed Banks",
        class: GroupClass::Bank,
        members: &[
            "ATE_CMD_BANK_PE_ALL_REG_ACCESS",
            "ATE_CMD_BANK_PE_MACC",
            "ATE_CMD_BANK_PE_MULT5X5",
            "ATE_CMD_BANK_PE_ACC",
            "ATE_CMD_BANK_PE_ROTATE",
            "ATE_CMD_BANK_PE_NORM_PRIORITY",
            "ATE_CMD_BANK_PE_GEMV_FP8",
            "ATE_CMD_BANK_PE_GEMV_FP8_SFP16",
            "ATE_CMD_BANK_PE_GEMV_SFP16",
            "ATE_CMD_BANK_PE_GEMV_INT4",
            "ATE_CMD_BANK_PE_GEMV_INT8",
            "ATE_CMD_BANK_PE_ROW_REDUCE",
            "ATE_CMD_BANK_PE_NORM_REDUCE_ADDER",
            "ATE_CMD_BANK_PE_NORM_BYTEADDER_SHIFT_PRIO",
            "ATE_CMD_BANK_PE_GEMV_BROADCAST",
            "ATE_CMD_BANK_PE_GEMV_SPARSITY",
            "ATE_CMD_BANK_PE_NORM_DATA_MUX",
            "ATE_CMD_BANK_GEMV_HALF_ZERO",
            "ATE_CMD_BANK_PE_NORM",
            "ATE_CMD_BANK_PE_ZERO_DETECT",
            "ATE_CMD_BANK_NOC_BUFFER",
        ],
    },
    FailureGroup {
        column: "Bank Cram Test",
        label: "Bank Cram Test",
        class: GroupClass::Bank,
        members: &[
            "ATE_CMD_BANK_CRAM_BIST_10N",
            "ATE_CMD_BANK_CRAM_BIST_FULL",
            "ATE_CMD_BANK_CRAM_BIST_B2B",
            "ATE_CMD_BANK_CRAM_BIST_BURST",
        ],
    },
    FailureGroup {
        column: "UCM_ALL",
        label: "UCM",
        class: GroupClass::NonBank,
        members: &["ATE_CMD_UCM_ALL"],
    },
    FailureGroup {
        column: "LPDDR Test",
        label: "LPDDR",
        class: GroupClass::NonBank,
        members: &[
            "ATE_CMD_DDR_APB_ACCESS",
            "ATE_CMD_DDR_MCU_MEM",
            "ATE_CMD_DDR_ACK_HO",
            "ATE_CMD_DDR_ACK_FS",
            "ATE_CMD_DDR_PHYINIT_TRAIN_NORTH",
            "ATE_CMD_DDR_PHYINIT_ALL_NORTH_WR_RD",
            "ATE_CMD_DDR_MEM_SWP_WRRD_N",
            "ATE_CMD_DDR_MEM_SWP_RDLOOP_N",
            "ATE_CMD_DDR_PHYINIT_TRAIN_EAST",
            "ATE_CMD_DDR_PHYINIT_ALL_EAST_WR_RD",
            "ATE_CMD_DDR_MEM_SWP_WRRD_E",
            "ATE_CMD_DDR_MEM_SWP_RDLOOP_E",
            "ATE_CMD_DDR_PHYINIT_FULL",
        ],
    },
    FailureGroup {
        column: "CMCM Functional Tests",
        label: "CMCM",
        class: GroupClass::NonBank,
        members: &["ATE_CMD_CMCM_ALL_FUNCTIONAL"],
    },
    FailureGroup {
        column: "Noc Route",
        label: "Noc Route",
        class: GroupClass::NonBank,
        members: &[
            "ATE_CMD_BANK_NOC_ROUTE_N",
            "ATE_CMD_BANK_NOC_ROUTE_S",
            "ATE_CMD_BANK_NOC_ROUTE_E",
            "ATE_CMD_BANK_NOC_ROUTE_W",
        ],
    },
    FailureGroup {
        column: "Noc PassThrough",
        label: "Noc Passthrough",
        class: GroupClass::NonBank,
        members: &[
            "ATE_CMD_BANK_NOC_PASSTHROUGH_N",
            "ATE_CMD_BANK_NOC_PASSTHROUGH_S",
            "ATE_CMD_BANK_NOC_PASSTHROUGH_E",
            "ATE_CMD_BANK_NOC_PASSTHROUGH_W",
        ],
    },
];

/// Group counter columns in the order they appear on wide/merge records.
pub const GROUP_COLUMNS: &[&str] = &[
    "Failed Banks",
    "Noc PassThrough",
    "Noc Route",
    "Bank Cram Test",
    "CMCM Functional Tests",
    "UCM_ALL",
    "LPDDR Test",
];

pub const CMCM_COLUMN: &str = "CMCM Functional Tests";
pub const LPDDR_COLUMN: &str = "LPDDR Test";

/// Look up a group by its record column.
pub fn group_by_column(column: &str) -> Option<&'static FailureGroup> {
    FAILURE_GROUPS.iter().find(|g| g.column == column)
}

/// Every test whose grade must be extracted: the wide columns plus group
/// members that are not wide columns, deduplicated, catalog order first.
pub fn graded_test_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = TEST_IDS.to_vec();
    for group in FAILURE_GROUPS {
        for member in group.members {
            if !ids.contains(member) {
                ids.push(member);
            }
        }
    }
    ids
}

// -- Test categories (long format) ------------------------------------------

pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

pub const TEST_CATEGORIES: &[(&str, &str)] = &[
    ("ATE_CMD_DDR_APB_ACCESS", "LPDDR Test"),
    ("ATE_CMD_DDR_MCU_MEM", "LPDDR Test"),
    ("ATE_CMD_DDR_ACK_HO", "LPDDR Test"),
    ("ATE_CMD_DDR_ACK_FS", "LPDDR Test"),
    ("ATE_CMD_DDR_PHYINIT_TRAIN_NORTH", "LPDDR Test"),
    ("ATE_CMD_DDR_PHYINIT_ALL_NORTH_WR_RD", "LPDDR Test"),
    ("ATE_CMD_DDR_MEM_SWP_WRRD_N", "LPDDR Test"),
    ("ATE_CMD_DDR_MEM_SWP_RDLOOP_N", "LPDDR Test"),
    ("ATE_CMD_DDR_PHYINIT_TRAIN_EAST", "LPDDR Test"),
    ("ATE_CMD_DDR_PHYINIT_ALL_EAST_WR_RD", "LPDDR Test"),
    ("ATE_CMD_DDR_MEM_SWP_WRRD_E", "LPDDR Test"),
    ("ATE_CMD_DDR_MEM_SWP_RDLOOP_E", "LPDDR Test"),
    ("ATE_CMD_DDR_PHYINIT_FULL", "LPDDR Test"),
    ("ATE_CMD_BANK_PE_ALL_REG_ACCESS", "Failed Banks"),
    ("ATE_CMD_BANK_PE_MACC", "Failed Banks"),
    ("ATE_CMD_BANK_PE_MULT5X5", "Failed Banks"),
    ("ATE_CMD_BANK_PE_ACC", "Failed Banks"),
    ("ATE_CMD_BANK_PE_ROTATE", "Failed Banks"),
    ("ATE_CMD_BANK_PE_NORM_PRIORITY", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_FP8", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_FP8_SFP16", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_SFP16", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_INT4", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_INT8", "Failed Banks"),
    ("ATE_CMD_BANK_PE_ROW_REDUCE", "Failed Banks"),
    ("ATE_CMD_BANK_PE_NORM_REDUCE_ADDER", "Failed Banks"),
    ("ATE_CMD_BANK_PE_NORM_BYTEADDER_SHIFT_PRIO", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_BROADCAST", "Failed Banks"),
    ("ATE_CMD_BANK_PE_GEMV_SPARSITY", "Failed Banks"),
    ("ATE_CMD_BANK_PE_NORM_DATA_MUX", "Failed Banks"),
    ("ATE_CMD_BANK_GEMV_HALF_ZERO", "Failed Banks"),
    ("ATE_CMD_BANK_PE_NORM", "Failed Banks"),
    ("ATE_CMD_BANK_PE_ZERO_DETECT", "Failed Banks"),
    ("ATE_CMD_BANK_NOC_PASSTHROUGH_N", "Noc PassThrough"),
    ("ATE_CMD_BANK_NOC_PASSTHROUGH_S", "Noc PassThrough"),
    ("ATE_CMD_BANK_NOC_PASSTHROUGH_E", "Noc PassThrough"),
    ("ATE_CMD_BANK_NOC_PASSTHROUGH_W", "Noc PassThrough"),
    ("ATE_CMD_BANK_NOC_ROUTE_N", "Noc Route"),
    ("ATE_CMD_BANK_NOC_ROUTE_S", "Noc Route"),
    ("ATE_CMD_BANK_NOC_ROUTE_E", "Noc Route"),
    ("ATE_CMD_BANK_NOC_ROUTE_W", "Noc Route"),
    ("ATE_CMD_BANK_NOC_BUFFER", "Failed Banks"),
    ("ATE_CMD_BANK_CRAM_BIST_10N", "Bank Cram Test"),
    ("ATE_CMD_BANK_CRAM_BIST_FULL", "Bank Cram Test"),
    ("ATE_CMD_BANK_CRAM_BIST_B2B", "Bank Cram Test"),
    ("ATE_CMD_BANK_CRAM_BIST_BURST", "Bank Cram Test"),
    ("ATE_CMD_CMCM_ALL_FUNCTIONAL", "CMCM Functional Tests"),
    ("ATE_CMD_UCM_ALL", "UCM_ALL"),
    ("ATE_CMD_PCM_SKT_SCAN_E", "PCM Fails"),
    ("ATE_CMD_PCM_SKT_SCAN_W", "PCM Fails"),
    ("ATE_CMD_PCM_SKT_SCAN_S", "PCM Fails"),
    ("ATE_CMD_PCM_SKT_SCAN_N", "PCM Fails"),
    ("ATE_CMD_PCM_BANK_IDC_PING_S", "Failed Banks"),
    ("ATE_CMD_PCM_IDC_READ_WRITE_S", "PCM Fails"),
    ("ATE_CMD_BANK_GEMV_QUARTER_POWER", "Power"),
    ("ATE_CMD_BANK_GEMV_POWER_STATUS_CHECK", "Power"),
];

/// Category for a test id; unknown ids are tagged, never rejected.
pub fn test_category(test_id: &str) -> &'static str {
    let id = test_id.trim();
    TEST_CATEGORIES
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, category)| *category)
        .unwrap_or(UNKNOWN_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_sizes() {
        assert_eq!(SCALAR_COLUMNS.len(), 22);
        assert_eq!(FIELD_PATTERNS.len(), 20);
        assert_eq!(TEST_IDS.len(), 48);
        assert_eq!(FAILURE_GROUPS.len(), 7);
        assert_eq!(GROUP_COLUMNS.len(), FAILURE_GROUPS.len());
        assert_eq!(TEST_CATEGORIES.len(), 56);
    }

    #[test]
    fn every_pattern_targets_a_scalar_column() {
        for (column, _) in FIELD_PATTERNS {
            assert!(SCALAR_COLUMNS.contains(column), "{column} not a scalar column");
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let unique: HashSet<&str> = TEST_IDS.iter().copied().collect();
        assert_eq!(unique.len(), TEST_IDS.len());
    }

    #[test]
    fn graded_ids_cover_group_members() {
        let graded = graded_test_ids();
        for group in FAILURE_GROUPS {
            for member in group.members {
                assert!(graded.contains(member));
            }
        }
        assert!(graded.contains(&"ATE_CMD_BANK_PE_ZERO_DETECT"));
        assert_eq!(&graded[..TEST_IDS.len()], TEST_IDS);
    }

    #[test]
    fn group_columns_match_groups() {
        for column in GROUP_COLUMNS {
            assert!(group_by_column(column).is_some());
        }
    }

    #[test]
    fn category_lookup_tags_unknown() {
        assert_eq!(test_category("ATE_CMD_UCM_ALL"), "UCM_ALL");
        assert_eq!(test_category(" ATE_CMD_DDR_ACK_HO "), "LPDDR Test");
        assert_eq!(test_category("ATE_CMD_SOMETHING_NEW"), UNKNOWN_CATEGORY);
    }
}
