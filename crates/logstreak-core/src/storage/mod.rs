mod config;
pub mod database;
mod memory;

pub use config::{Config, StorageConfig, StreakConfig};
pub use database::Database;
pub use memory::MemoryStorage;

use std::path::PathBuf;

use crate::error::StorageError;

/// String-keyed store holding the streak record.
pub trait Storage {
    /// Value under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite `key` with `value`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/logstreak[-dev]/` based on LOGSTREAK_ENV.
///
/// Set LOGSTREAK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LOGSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("logstreak-dev")
    } else {
        base_dir.join("logstreak")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
