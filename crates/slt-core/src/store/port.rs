//! The storage port the batch service writes through.

use crate::errors::SltResult;
use crate::models::Row;

/// Named sheets of ordered rows.
///
/// Implementations must keep row order within a sheet and column order
/// within a row.  Fetching a sheet that was never written yields no rows.
pub trait SheetStore: Send + Sync {
    fn append(&self, sheet: &str, rows: &[Row]) -> SltResult<()>;

    /// Drop every row of `sheet`, then write `rows`.
    fn replace(&self, sheet: &str, rows: &[Row]) -> SltResult<()>;

    fn fetch(&self, sheet: &str) -> SltResult<Vec<Row>>;

    fn clear(&self, sheet: &str) -> SltResult<()> {
        self.replace(sheet, &[])
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every adapter must share; each adapter's tests call these.

    use super::*;
    use crate::models::row_from;

    fn row(id: &str) -> Row {
        row_from([("Marking Id", id.to_string()), ("Final Bin", "N/A".to_string())])
    }

    pub fn append_keeps_order(store: &dyn SheetStore) {
        store.append("Merge", &[row("a"), row("b")]).unwrap();
        store.append("Merge", &[row("c")]).unwrap();
        let rows = store.fetch("Merge").unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["Marking Id"].as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(columns, ["Marking Id", "Final Bin"]);
    }

    pub fn replace_and_clear(store: &dyn SheetStore) {
        store.append("SLT Tracker", &[row("old")]).unwrap();
        store.replace("SLT Tracker", &[row("new")]).unwrap();
        let rows = store.fetch("SLT Tracker").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Marking Id"], "new");

        store.clear("SLT Tracker").unwrap();
        assert!(store.fetch("SLT Tracker").unwrap().is_empty());
    }

    pub fn sheets_are_independent(store: &dyn SheetStore) {
        store.append("Format 1", &[row("x")]).unwrap();
        assert!(store.fetch("Format 2").unwrap().is_empty());
        assert!(store.fetch("never written").unwrap().is_empty());
    }
}
