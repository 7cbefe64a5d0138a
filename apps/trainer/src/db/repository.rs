//! SQLite implementation of the key-value store.

use crate::db::error::DbError;
use crate::db::schema::{INIT_SCHEMA_VERSION, SCHEMA, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use vocab_core::{KeyValueStore, StoreError};

type Result<T> = std::result::Result<T, DbError>;

/// Key-value store backed by a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing and as a fallback).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute_batch(INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get::<_, Option<i32>>(0)
            })?;
        Ok(version.unwrap_or(SCHEMA_VERSION))
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove_value(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// When a key was last written. Unparseable timestamps read as `None`.
    pub fn last_updated(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        self.get_value(key).map_err(Into::into)
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        self.set_value(key, value).map_err(Into::into)
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StoreError> {
        self.remove_value(key).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn initializes_schema() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn set_get_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("progress_v1").unwrap(), None);

        store.set("progress_v1", r#"{"v":1}"#).unwrap();
        assert_eq!(store.get("progress_v1").unwrap(), Some(r#"{"v":1}"#.to_string()));

        store.set("progress_v1", r#"{"v":2}"#).unwrap();
        assert_eq!(store.get("progress_v1").unwrap(), Some(r#"{"v":2}"#.to_string()));

        store.remove("progress_v1").unwrap();
        assert_eq!(store.get("progress_v1").unwrap(), None);
        store.remove("progress_v1").unwrap();
    }

    #[test]
    fn records_update_time() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.last_updated("showPopup").unwrap(), None);

        let before = Utc::now();
        store.set("showPopup", "false").unwrap();
        let updated = store.last_updated("showPopup").unwrap().unwrap();
        assert!(updated >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn opens_file_database_in_new_directory() {
        let dir = std::env::temp_dir().join(format!("vocab-trainer-db-{}", std::process::id()));
        let path = dir.join("nested").join("progress.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("k", "v").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        drop(store);
        std::fs::remove_dir_all(&dir).ok();
    }
}
