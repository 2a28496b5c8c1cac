//! Repository for database CRUD operations.

use super::models::{ConfigInput, ConfigSummary, DbConfig, DbSecret, SecretInput};
use crate::error::{NovaError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Arc, Mutex, MutexGuard};

const CONFIG_COLUMNS: &str = "filename, shorthand, content, created_at, updated_at";
const SECRET_COLUMNS: &str = "project, path, content, created_at, updated_at";

/// Repository over the `configs` and `secrets` tables.
///
/// Every method is a single statement (or a statement plus a read-back);
/// there are no explicit transactions and concurrent writers to the same key
/// are last-write-wins.
pub struct Repository {
    conn: Arc<Mutex<Connection>>,
}

impl Repository {
    /// Create a new repository with the given connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| NovaError::Other(format!("database connection poisoned: {}", e)))
    }

    // ========================================================================
    // Config operations
    // ========================================================================

    /// Find the first config with the given shorthand.
    pub fn find_config_by_shorthand(&self, shorthand: &str) -> Result<Option<DbConfig>> {
        tracing::debug!(shorthand, "looking up config");
        let conn = self.lock()?;
        let result = conn
            .query_row(
                &format!(
                    "SELECT {} FROM configs WHERE shorthand = ? ORDER BY rowid LIMIT 1",
                    CONFIG_COLUMNS
                ),
                [shorthand],
                |row| Self::row_to_config(row),
            )
            .optional()?;
        Ok(result)
    }

    /// Find a config by its primary key.
    pub fn find_config_by_filename(&self, filename: &str) -> Result<Option<DbConfig>> {
        let conn = self.lock()?;
        let result = conn
            .query_row(
                &format!("SELECT {} FROM configs WHERE filename = ?", CONFIG_COLUMNS),
                [filename],
                |row| Self::row_to_config(row),
            )
            .optional()?;
        Ok(result)
    }

    /// List every config's `(shorthand, filename)` in store order.
    pub fn list_configs(&self) -> Result<Vec<ConfigSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT shorthand, filename FROM configs ORDER BY rowid")?;

        let configs = stmt
            .query_map([], |row| {
                Ok(ConfigSummary {
                    shorthand: row.get(0)?,
                    filename: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(configs)
    }

    /// Insert or replace a config keyed by filename. Returns the stored row.
    pub fn upsert_config(&self, config: &ConfigInput) -> Result<DbConfig> {
        tracing::info!(filename = %config.filename, shorthand = %config.shorthand, "storing config");
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO configs (filename, shorthand, content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(filename) DO UPDATE SET
                shorthand = excluded.shorthand,
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
            params![config.filename, config.shorthand, config.content, now],
        )?;

        let stored = conn.query_row(
            &format!("SELECT {} FROM configs WHERE filename = ?", CONFIG_COLUMNS),
            [&config.filename],
            |row| Self::row_to_config(row),
        )?;
        Ok(stored)
    }

    /// Delete every config with the given shorthand. Returns the number removed.
    pub fn delete_configs_by_shorthand(&self, shorthand: &str) -> Result<usize> {
        tracing::info!(shorthand, "deleting config");
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM configs WHERE shorthand = ?", [shorthand])?;
        Ok(deleted)
    }

    // ========================================================================
    // Secret operations
    // ========================================================================

    /// Find the secret stored for a project.
    pub fn find_secret(&self, project: &str) -> Result<Option<DbSecret>> {
        tracing::debug!(project, "looking up secret");
        let conn = self.lock()?;
        let result = conn
            .query_row(
                &format!("SELECT {} FROM secrets WHERE project = ?", SECRET_COLUMNS),
                [project],
                |row| Self::row_to_secret(row),
            )
            .optional()?;
        Ok(result)
    }

    /// List all secrets in store order.
    pub fn list_secrets(&self) -> Result<Vec<DbSecret>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM secrets ORDER BY rowid",
            SECRET_COLUMNS
        ))?;

        let secrets = stmt
            .query_map([], |row| Self::row_to_secret(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(secrets)
    }

    /// Insert or replace the secret for a project. Returns the stored row.
    pub fn upsert_secret(&self, secret: &SecretInput) -> Result<DbSecret> {
        tracing::info!(project = %secret.project, path = %secret.path, "storing secret");
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO secrets (project, path, content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(project) DO UPDATE SET
                path = excluded.path,
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
            params![secret.project, secret.path, secret.content, now],
        )?;

        let stored = conn.query_row(
            &format!("SELECT {} FROM secrets WHERE project = ?", SECRET_COLUMNS),
            [&secret.project],
            |row| Self::row_to_secret(row),
        )?;
        Ok(stored)
    }

    // ========================================================================
    // Helper functions
    // ========================================================================

    /// Parse a stored timestamp. Rows written by nova use RFC 3339; rows
    /// inserted by hand fall back to SQLite's `datetime('now')` format.
    fn parse_timestamp(raw: Option<String>) -> DateTime<Utc> {
        let Some(s) = raw else {
            tracing::warn!("missing timestamp in stored row, using current time");
            return Utc::now();
        };

        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                    .map(|naive| naive.and_utc())
                    .ok()
            })
            .unwrap_or_else(|| {
                tracing::warn!(raw = %s, "unparseable timestamp in stored row, using current time");
                Utc::now()
            })
    }

    fn row_to_config(row: &rusqlite::Row) -> rusqlite::Result<DbConfig> {
        Ok(DbConfig {
            filename: row.get(0)?,
            shorthand: row.get(1)?,
            content: row.get(2)?,
            created_at: Self::parse_timestamp(row.get(3).ok()),
            updated_at: Self::parse_timestamp(row.get(4).ok()),
        })
    }

    fn row_to_secret(row: &rusqlite::Row) -> rusqlite::Result<DbSecret> {
        Ok(DbSecret {
            project: row.get(0)?,
            path: row.get(1)?,
            content: row.get(2)?,
            created_at: Self::parse_timestamp(row.get(3).ok()),
            updated_at: Self::parse_timestamp(row.get(4).ok()),
        })
    }
}

impl Clone for Repository {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_db;

    fn repo() -> Repository {
        Repository::new(init_memory_db().unwrap())
    }

    fn config(filename: &str, shorthand: &str, content: &str) -> ConfigInput {
        ConfigInput {
            filename: filename.to_string(),
            shorthand: shorthand.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_config_upsert_and_find() {
        let repo = repo();
        assert!(repo.find_config_by_shorthand("prettier").unwrap().is_none());

        repo.upsert_config(&config(".prettierrc", "prettier", "{}")).unwrap();

        let found = repo.find_config_by_shorthand("prettier").unwrap().unwrap();
        assert_eq!(found.filename, ".prettierrc");
        assert_eq!(found.content, "{}");
        assert_eq!(
            repo.find_config_by_filename(".prettierrc").unwrap().unwrap(),
            found
        );
    }

    #[test]
    fn test_config_upsert_replaces_by_filename() {
        let repo = repo();
        let first = repo.upsert_config(&config(".prettierrc", "prettier", "{}")).unwrap();
        let second = repo
            .upsert_config(&config(".prettierrc", "prettier", "{\"semi\": false}"))
            .unwrap();

        assert_eq!(repo.list_configs().unwrap().len(), 1);
        assert_eq!(second.content, "{\"semi\": false}");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_list_configs_keeps_store_order() {
        let repo = repo();
        repo.upsert_config(&config("tsconfig.json", "ts", "{}")).unwrap();
        repo.upsert_config(&config(".eslintrc", "eslint", "{}")).unwrap();
        repo.upsert_config(&config(".prettierrc", "prettier", "{}")).unwrap();
        // Updating an existing row must not move it
        repo.upsert_config(&config("tsconfig.json", "ts", "{\"strict\": true}")).unwrap();

        let shorthands: Vec<_> = repo
            .list_configs()
            .unwrap()
            .into_iter()
            .map(|c| c.shorthand)
            .collect();
        assert_eq!(shorthands, vec!["ts", "eslint", "prettier"]);
    }

    #[test]
    fn test_find_by_shorthand_takes_first_match() {
        let repo = repo();
        repo.upsert_config(&config("a.json", "dup", "first")).unwrap();
        repo.upsert_config(&config("b.json", "dup", "second")).unwrap();

        let found = repo.find_config_by_shorthand("dup").unwrap().unwrap();
        assert_eq!(found.filename, "a.json");
    }

    #[test]
    fn test_delete_configs_by_shorthand() {
        let repo = repo();
        repo.upsert_config(&config(".prettierrc", "prettier", "{}")).unwrap();

        assert_eq!(repo.delete_configs_by_shorthand("prettier").unwrap(), 1);
        assert_eq!(repo.delete_configs_by_shorthand("prettier").unwrap(), 0);
        assert!(repo.list_configs().unwrap().is_empty());
    }

    #[test]
    fn test_secret_upsert_overwrites_by_project() {
        let repo = repo();
        repo.upsert_secret(&SecretInput {
            project: "nova".to_string(),
            path: ".env".to_string(),
            content: "AAAA".to_string(),
        })
        .unwrap();
        repo.upsert_secret(&SecretInput {
            project: "nova".to_string(),
            path: ".env.local".to_string(),
            content: "BBBB".to_string(),
        })
        .unwrap();

        let secrets = repo.list_secrets().unwrap();
        assert_eq!(secrets.len(), 1);

        let secret = repo.find_secret("nova").unwrap().unwrap();
        assert_eq!(secret.path, ".env.local");
        assert_eq!(secret.content, "BBBB");
        assert!(repo.find_secret("other").unwrap().is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = Repository::parse_timestamp(Some("2024-03-01T10:00:00+00:00".to_string()));
        assert_eq!(rfc.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let sqlite = Repository::parse_timestamp(Some("2024-03-01 10:00:00".to_string()));
        assert_eq!(sqlite, rfc);
    }

    #[test]
    fn test_corrupt_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let parsed = Repository::parse_timestamp(Some("yesterday-ish".to_string()));
        assert!(parsed >= before);
        assert!(Repository::parse_timestamp(None) >= before);
    }
}
