//! SQLite DDL for the sheet store and its migration steps.

use rusqlite::Connection;

use crate::errors::SltResult;

/// Migrations run from the stored version up to this one.
pub const SCHEMA_VERSION: i32 = 2;

/// Replayable on an initialised database (`IF NOT EXISTS` throughout).
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS store_meta (
        key TEXT PRIMARY KEY,
        value TEXT
    );",
    "CREATE TABLE IF NOT EXISTS sheet_rows (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sheet TEXT NOT NULL,
        position INTEGER NOT NULL,
        row_json TEXT NOT NULL,
        UNIQUE(sheet, position)
    );",
    "CREATE TABLE IF NOT EXISTS migration_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        from_version INTEGER NOT NULL,
        to_version INTEGER NOT NULL,
        status TEXT NOT NULL,
        error_message TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    );",
    "CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet_position ON sheet_rows(sheet, position);",
];

pub fn apply_schema(conn: &Connection) -> SltResult<()> {
    for stmt in SCHEMA_STATEMENTS {
        conn.execute_batch(stmt)?;
    }
    migrate_schema(conn)
}

// ─── Migration framework ────────────────────────────────────────────────────

/// Run pending migrations.  Each step sits in its own SAVEPOINT; a failing
/// step is rolled back alone and recorded in `migration_history`.
pub fn migrate_schema(conn: &Connection) -> SltResult<()> {
    let mut current_version = get_schema_version(conn);

    while current_version < SCHEMA_VERSION {
        let next_version = current_version + 1;
        conn.execute_batch("SAVEPOINT slt_migrate_step;")?;

        let step_result = (|| -> SltResult<()> {
            match next_version {
                1 => {}
                2 => migrate_to_v2(conn)?,
                _ => {}
            }
            set_schema_version(conn, next_version)?;
            record_migration_step(conn, current_version, next_version, "success", None)?;
            conn.execute_batch("RELEASE SAVEPOINT slt_migrate_step;")?;
            Ok(())
        })();

        match step_result {
            Ok(()) => current_version = next_version,
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK TO SAVEPOINT slt_migrate_step;");
                let _ = conn.execute_batch("RELEASE SAVEPOINT slt_migrate_step;");
                let _ = record_migration_step(
                    conn,
                    current_version,
                    next_version,
                    "failed",
                    Some(&e.to_string()),
                );
                return Err(e);
            }
        }
    }

    Ok(())
}

/// 0 when the key is absent or unparseable.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT value FROM store_meta WHERE key = 'schema_version';",
        [],
        |row| row.get::<_, String>(0),
    )
    .ok()
    .and_then(|v| v.parse().ok())
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SltResult<()> {
    set_meta(conn, "schema_version", &version.to_string())
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> SltResult<()> {
    conn.execute(
        "INSERT INTO store_meta(key, value) VALUES(?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

pub fn get_meta(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row(
        "SELECT value FROM store_meta WHERE key = ?1;",
        [key],
        |row| row.get(0),
    )
    .ok()
}

fn record_migration_step(
    conn: &Connection,
    from_v: i32,
    to_v: i32,
    status: &str,
    error_msg: Option<&str>,
) -> SltResult<()> {
    conn.execute(
        "INSERT INTO migration_history(from_version, to_version, status, error_message) \
         VALUES (?1, ?2, ?3, ?4);",
        rusqlite::params![from_v, to_v, status, error_msg],
    )?;
    Ok(())
}

// ─── Individual migration steps ─────────────────────────────────────────────

/// v1 -> v2: sheet lookups go through (sheet, position).
fn migrate_to_v2(conn: &Connection) -> SltResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet_position \
         ON sheet_rows(sheet, position);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(conn: &Connection) -> Vec<(i32, i32, String)> {
        let mut stmt = conn
            .prepare("SELECT from_version, to_version, status FROM migration_history ORDER BY id;")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn migrate_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        assert_eq!(
            history(&conn),
            [(0, 1, "success".to_string()), (1, 2, "success".to_string())]
        );
    }

    #[test]
    fn migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        assert_eq!(history(&conn).len(), 2);
    }

    #[test]
    fn resumes_from_stored_version() {
        let conn = Connection::open_in_memory().unwrap();
        for stmt in SCHEMA_STATEMENTS {
            conn.execute_batch(stmt).unwrap();
        }
        set_meta(&conn, "schema_version", "1").unwrap();
        migrate_schema(&conn).unwrap();
        assert_eq!(history(&conn), [(1, 2, "success".to_string())]);
    }

    #[test]
    fn meta_upserts() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        assert_eq!(get_meta(&conn, "last_run_id"), None);
        set_meta(&conn, "last_run_id", "a").unwrap();
        set_meta(&conn, "last_run_id", "b").unwrap();
        assert_eq!(get_meta(&conn, "last_run_id").as_deref(), Some("b"));
    }
}
