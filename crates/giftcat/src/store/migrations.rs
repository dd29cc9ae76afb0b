//! Schema migrations for the SQLite session store.
//!
//! Applied versions live in `_migrations`. Each pending migration runs in its
//! own transaction together with its bookkeeping row.

use rusqlite::{params, Connection};

use super::error::StoreError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create_session_entries_table",
    sql: include_str!("sql/001_create_session_entries.sql"),
}];

const CREATE_LEDGER: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at TEXT NOT NULL
);";

fn latest_applied(conn: &Connection) -> Result<u32, StoreError> {
    let version = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |r| {
        r.get(0)
    })?;
    Ok(version)
}

fn apply(conn: &Connection, migration: &Migration) -> Result<(), StoreError> {
    let failed = |e: rusqlite::Error| StoreError::Migration {
        version: migration.version,
        reason: e.to_string(),
    };

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql).map_err(failed)?;
    tx.execute(
        "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )
    .map_err(failed)?;
    tx.commit()?;
    Ok(())
}

/// Brings the schema up to date. Returns how many migrations were applied.
pub fn run_all(conn: &Connection) -> Result<usize, StoreError> {
    conn.execute_batch(CREATE_LEDGER)?;
    let current = latest_applied(conn)?;

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
    for migration in &pending {
        log::info!(
            "Applying session store migration v{} ({})",
            migration.version,
            migration.description
        );
        apply(conn, migration)?;
    }

    if pending.is_empty() {
        log::debug!("Session store schema is current at v{}", current);
    }
    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_applies_everything() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_all(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(latest_applied(&conn).unwrap(), 1);
    }

    #[test]
    fn test_second_run_applies_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        assert_eq!(run_all(&conn).unwrap(), 0);
    }

    #[test]
    fn test_session_entries_accepts_rows() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        conn.execute(
            "INSERT INTO session_entries (key, value, updated_at) VALUES ('k', 'v', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
    }
}
