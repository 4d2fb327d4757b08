//! TOML-based application configuration.
//!
//! Stored at `~/.config/logstreak/config.toml`:
//!
//! ```toml
//! [streak]
//! key = "streak"
//! day_diff = "calendar"   # or "elapsed"
//!
//! [storage]
//! db_file = "logstreak.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use super::database::DEFAULT_DB_FILE;
use crate::error::{ConfigError, StorageError};
use crate::streak::{DayDiffMode, StreakEngine, KEY};

/// Streak evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default)]
    pub day_diff: DayDiffMode,
}

/// Where the kv database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file. Relative paths resolve against the data directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_key() -> String {
    KEY.to_string()
}
fn default_db_file() -> String {
    DEFAULT_DB_FILE.to_string()
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            day_diff: DayDiffMode::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Object(_) => return Err(invalid("cannot replace a section".into())),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if updated.streak.key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "streak key must not be empty".into(),
            });
        }
        *self = updated;
        Ok(())
    }

    /// Engine configured with this key and day-diff mode.
    pub fn engine(&self) -> StreakEngine {
        StreakEngine::new()
            .with_key(self.streak.key.clone())
            .with_mode(self.streak.day_diff)
    }

    /// Database file path, resolved against `base` when relative.
    pub fn db_path(&self, base: &Path) -> PathBuf {
        let file = Path::new(&self.storage.db_file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            base.join(file)
        }
    }

    /// Database file path, resolving relative paths against [`data_dir`].
    ///
    /// # Errors
    /// Returns an error if the path is relative and the data directory cannot
    /// be created.
    pub fn resolved_db_path(&self) -> Result<PathBuf, StorageError> {
        let file = Path::new(&self.storage.db_file);
        if file.is_absolute() {
            Ok(file.to_path_buf())
        } else {
            Ok(self.db_path(&data_dir()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(toml_str.contains("day_diff = \"calendar\""));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: Config = toml::from_str("[streak]\nday_diff = \"elapsed\"\n").unwrap();
        assert_eq!(parsed.streak.key, "streak");
        assert_eq!(parsed.streak.day_diff, DayDiffMode::Elapsed);
        assert_eq!(parsed.storage.db_file, "logstreak.db");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("streak.key").as_deref(), Some("streak"));
        assert_eq!(cfg.get("streak.day_diff").as_deref(), Some("calendar"));
        assert_eq!(cfg.get("storage.db_file").as_deref(), Some("logstreak.db"));
        assert!(cfg.get("streak.missing").is_none());
        assert!(cfg.get("streak").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_mode() {
        let mut cfg = Config::default();
        cfg.set("streak.day_diff", "elapsed").unwrap();
        assert_eq!(cfg.streak.day_diff, DayDiffMode::Elapsed);
        assert_eq!(cfg.engine().mode(), DayDiffMode::Elapsed);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("streak.nonexistent", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("nope", "x"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_mode() {
        let mut cfg = Config::default();
        let result = cfg.set("streak.day_diff", "weekly");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.streak.day_diff, DayDiffMode::Calendar);
    }

    #[test]
    fn set_rejects_empty_key_and_sections() {
        let mut cfg = Config::default();
        assert!(cfg.set("streak.key", "").is_err());
        assert!(cfg.set("streak", "x").is_err());
        assert_eq!(cfg.streak.key, "streak");
    }

    #[test]
    fn db_path_resolves_relative_files() {
        let mut cfg = Config::default();
        let base = Path::new("/data");
        assert_eq!(cfg.db_path(base), PathBuf::from("/data/logstreak.db"));
        cfg.storage.db_file = "/var/lib/streak.db".into();
        assert_eq!(cfg.db_path(base), PathBuf::from("/var/lib/streak.db"));
    }

    #[test]
    fn resolved_db_path_keeps_absolute_files() {
        let mut cfg = Config::default();
        cfg.storage.db_file = "/var/lib/streak.db".into();
        assert_eq!(cfg.resolved_db_path().unwrap(), PathBuf::from("/var/lib/streak.db"));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_load_preserve_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("streak.key", "daily").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.streak.key, "daily");
        assert_eq!(loaded.engine().key(), "daily");
    }

    #[test]
    fn load_from_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "streak = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
