//! [`SheetStore`] persisted in a SQLite file.
//!
//! Every call opens its own connection, so the store is `Send + Sync`
//! without holding a connection across threads.  Rows are stored as JSON
//! objects; column order survives the round trip.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Transaction};
use tracing::debug;

use crate::config::expand_tilde;
use crate::errors::{SltError, SltResult};
use crate::models::Row;
use crate::store::port::SheetStore;
use crate::store::schema;

pub const LAST_RUN_KEY: &str = "last_run_id";

#[derive(Clone, Debug)]
pub struct SqliteSheetStore {
    db_path: PathBuf,
}

impl SqliteSheetStore {
    /// Open (or create) the database at `db_path` and bring its schema up to
    /// date.  A leading `~` is expanded and parent directories are created.
    pub fn open(db_path: impl AsRef<Path>) -> SltResult<Self> {
        let raw = db_path.as_ref().to_string_lossy();
        let resolved = expand_tilde(&raw);
        if resolved.as_os_str().is_empty() {
            return Err(SltError::Storage("empty database path".to_string()));
        }
        if let Some(parent) = resolved.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self { db_path: resolved };
        schema::apply_schema(&store.connect()?)?;
        debug!("sheet store ready at {}", store.db_path.display());
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> SltResult<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Remember the id of the last batch written.
    pub fn record_run(&self, run_id: &str) -> SltResult<()> {
        schema::set_meta(&self.connect()?, LAST_RUN_KEY, run_id)
    }

    pub fn last_run(&self) -> SltResult<Option<String>> {
        Ok(schema::get_meta(&self.connect()?, LAST_RUN_KEY))
    }

    /// Sheet names holding at least one row, alphabetically.
    pub fn sheet_names(&self) -> SltResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT DISTINCT sheet FROM sheet_rows ORDER BY sheet;")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

fn next_position(tx: &Transaction<'_>, sheet: &str) -> SltResult<i64> {
    let max: Option<i64> = tx.query_row(
        "SELECT MAX(position) FROM sheet_rows WHERE sheet = ?1;",
        [sheet],
        |row| row.get(0),
    )?;
    Ok(max.map_or(0, |m| m + 1))
}

fn insert_rows(tx: &Transaction<'_>, sheet: &str, start: i64, rows: &[Row]) -> SltResult<()> {
    let mut stmt =
        tx.prepare("INSERT INTO sheet_rows(sheet, position, row_json) VALUES (?1, ?2, ?3);")?;
    for (offset, row) in rows.iter().enumerate() {
        let json = serde_json::to_string(row)?;
        stmt.execute(params![sheet, start + offset as i64, json])?;
    }
    Ok(())
}

impl SheetStore for SqliteSheetStore {
    fn append(&self, sheet: &str, rows: &[Row]) -> SltResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let start = next_position(&tx, sheet)?;
        insert_rows(&tx, sheet, start, rows)?;
        tx.commit()?;
        Ok(())
    }

    fn replace(&self, sheet: &str, rows: &[Row]) -> SltResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sheet_rows WHERE sheet = ?1;", [sheet])?;
        insert_rows(&tx, sheet, 0, rows)?;
        tx.commit()?;
        Ok(())
    }

    fn fetch(&self, sheet: &str) -> SltResult<Vec<Row>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT row_json FROM sheet_rows WHERE sheet = ?1 ORDER BY position;")?;
        let payloads = stmt
            .query_map([sheet], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        payloads
            .iter()
            .map(|json| serde_json::from_str::<Row>(json).map_err(SltError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row_from;
    use crate::store::port::contract;

    fn temp_store() -> (tempfile::TempDir, SqliteSheetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteSheetStore::open(dir.path().join("nested/slt.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn append_keeps_order() {
        let (_dir, store) = temp_store();
        contract::append_keeps_order(&store);
    }

    #[test]
    fn replace_and_clear() {
        let (_dir, store) = temp_store();
        contract::replace_and_clear(&store);
    }

    #[test]
    fn sheets_are_independent() {
        let (_dir, store) = temp_store();
        contract::sheets_are_independent(&store);
    }

    #[test]
    fn rows_survive_reopen() {
        let (dir, store) = temp_store();
        let row = row_from([("Zeta", "1".to_string()), ("Alpha", "2".to_string())]);
        store.append("Merge", &[row.clone()]).unwrap();
        store.record_run("abc123").unwrap();

        let reopened = SqliteSheetStore::open(dir.path().join("nested/slt.db")).unwrap();
        let rows = reopened.fetch("Merge").unwrap();
        assert_eq!(rows, vec![row]);
        let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(columns, ["Zeta", "Alpha"]);
        assert_eq!(reopened.last_run().unwrap().as_deref(), Some("abc123"));
        assert_eq!(reopened.sheet_names().unwrap(), ["Merge"]);
    }

    #[test]
    fn schema_is_current_after_open() {
        let (_dir, store) = temp_store();
        let conn = store.connect().unwrap();
        assert_eq!(schema::get_schema_version(&conn), schema::SCHEMA_VERSION);
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = SqliteSheetStore::open("").unwrap_err();
        assert!(matches!(err, SltError::Storage(_)));
        assert!(!err.is_parse_error());
    }
}
