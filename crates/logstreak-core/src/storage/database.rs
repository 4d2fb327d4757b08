//! SQLite-backed key-value storage.
//!
//! A single `kv` table maps string keys to string values.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{Config, Storage};
use crate::error::StorageError;

/// File name used by [`Database::open`] when no other is configured.
pub const DEFAULT_DB_FILE: &str = "logstreak.db";

/// SQLite database holding the kv table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database `config` points at, by default
    /// `~/.config/logstreak/logstreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open(config: &Config) -> Result<Self, StorageError> {
        Self::open_path(config.resolved_db_path()?)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key. Returns whether a row was removed.
    pub fn kv_delete(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let removed = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }
}

impl Storage for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn kv_delete_reports_removal() {
        let db = Database::open_memory().unwrap();
        db.kv_set("streak", "{}").unwrap();
        assert!(db.kv_delete("streak").unwrap());
        assert!(!db.kv_delete("streak").unwrap());
        assert!(db.kv_get("streak").unwrap().is_none());
    }

    #[test]
    fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("streak.db");
        {
            let mut db = Database::open_path(&path).unwrap();
            db.set("streak", "value").unwrap();
        }
        let db = Database::open_path(&path).unwrap();
        assert_eq!(db.get("streak").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn open_uses_absolute_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.db_file = dir.path().join("configured.db").display().to_string();

        let mut db = Database::open(&config).unwrap();
        db.set("streak", "value").unwrap();
        assert!(dir.path().join("configured.db").exists());
    }

    #[test]
    fn open_path_reports_bad_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("streak.db");
        let err = Database::open_path(&path).err().unwrap();
        assert!(matches!(err, StorageError::OpenFailed { .. }));
    }
}
