//! In-process [`SheetStore`] backed by a mutex-guarded map.

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::errors::SltResult;
use crate::models::Row;
use crate::store::port::SheetStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: Mutex<IndexMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of sheets that have been written, in first-write order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.lock().keys().cloned().collect()
    }
}

impl SheetStore for MemoryStore {
    fn append(&self, sheet: &str, rows: &[Row]) -> SltResult<()> {
        self.sheets
            .lock()
            .entry(sheet.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }

    fn replace(&self, sheet: &str, rows: &[Row]) -> SltResult<()> {
        self.sheets.lock().insert(sheet.to_string(), rows.to_vec());
        Ok(())
    }

    fn fetch(&self, sheet: &str) -> SltResult<Vec<Row>> {
        Ok(self.sheets.lock().get(sheet).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::port::contract;
    use crate::store::ALL_SHEETS;

    #[test]
    fn append_keeps_order() {
        contract::append_keeps_order(&MemoryStore::new());
    }

    #[test]
    fn replace_and_clear() {
        contract::replace_and_clear(&MemoryStore::new());
    }

    #[test]
    fn sheets_are_independent() {
        contract::sheets_are_independent(&MemoryStore::new());
    }

    #[test]
    fn tracks_sheet_names() {
        let store = MemoryStore::new();
        store.replace("Chart", &[]).unwrap();
        store.append("Yield", &[]).unwrap();
        assert_eq!(store.sheet_names(), ["Chart", "Yield"]);
    }

    #[test]
    fn every_sheet_starts_empty() {
        let store = MemoryStore::new();
        for sheet in ALL_SHEETS {
            assert!(store.fetch(sheet).unwrap().is_empty());
        }
    }
}
