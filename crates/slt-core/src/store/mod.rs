//! Sheet storage: the [`SheetStore`] port and its in-memory and SQLite
//! adapters.

pub mod memory;
pub mod port;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use port::SheetStore;
pub use sqlite::SqliteSheetStore;

pub const FORMAT_1: &str = "Format 1";
pub const FORMAT_2: &str = "Format 2";
pub const MERGE: &str = "Merge";
pub const SLT_TRACKER: &str = "SLT Tracker";
pub const YIELD: &str = "Yield";
pub const CHART: &str = "Chart";

pub const ALL_SHEETS: &[&str] = &[FORMAT_1, FORMAT_2, MERGE, SLT_TRACKER, YIELD, CHART];
