//! Database schema and initialization.

use rusqlite::{Connection, Result};
use std::path::Path;

use crate::error::NovaError;

const SCHEMA_VERSION: i32 = 1;

/// Initialize the database at the given path, creating tables if needed.
pub fn init_db(path: &Path) -> std::result::Result<Connection, NovaError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;

    // Secrets are encrypted but the configs table is plaintext
    if let Err(e) = crate::utils::restrict_file_permissions(path) {
        tracing::warn!("{}", e);
    }

    init_schema(&conn)?;
    Ok(conn)
}

/// Open a throwaway in-memory database with the full schema.
pub fn init_memory_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database, create all tables
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- Reusable project configuration files (stored in plaintext)
        CREATE TABLE configs (
            filename TEXT PRIMARY KEY,
            shorthand TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Not UNIQUE: `config add` refuses duplicates, lookups take the first row
        CREATE INDEX idx_configs_shorthand ON configs(shorthand);

        -- One encrypted secret file per project
        CREATE TABLE secrets (
            project TEXT PRIMARY KEY,
            path TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    Ok(())
}
