//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The default user's email and weight units
//! - Forecast horizon for the metrics pipeline
//! - History listing size
//! - Log level and log file rotation
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::metrics::{DEFAULT_WEEKS_AHEAD, MAX_WEEKS_AHEAD};

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// The single local user every command acts as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_email")]
    pub email: String,
    /// Display units for weights ("lb" or "kg"); values are stored as entered.
    #[serde(default = "default_units")]
    pub units: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Number of future weeks projected by the trend forecast.
    #[serde(default = "default_weeks_ahead")]
    pub weeks_ahead: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutsConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
    /// Rotate `gympal.log` once it grows past this many bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Number of rotated files kept (`gympal.log.1` ..).
    #[serde(default = "default_backups")]
    pub backups: u32,
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub workouts: WorkoutsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_email() -> String {
    "default@local".into()
}
fn default_units() -> String {
    "lb".into()
}
fn default_weeks_ahead() -> usize {
    DEFAULT_WEEKS_AHEAD
}
fn default_recent_limit() -> usize {
    20
}
fn default_level() -> String {
    "info".into()
}
fn default_max_bytes() -> u64 {
    500_000
}
fn default_backups() -> u32 {
    2
}
fn default_tail_lines() -> usize {
    200
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            units: default_units(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weeks_ahead: default_weeks_ahead(),
        }
    }
}

impl Default for WorkoutsConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            max_bytes: default_max_bytes(),
            backups: default_backups(),
            tail_lines: default_tail_lines(),
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

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| {
                        invalid(format!("cannot parse '{value}' as a non-negative integer"))
                    })?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("not a leaf value".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Reject values that parse but are out of range.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics.weeks_ahead > MAX_WEEKS_AHEAD {
            return Err(ConfigError::InvalidValue {
                key: "metrics.weeks_ahead".to_string(),
                message: format!("must be at most {MAX_WEEKS_AHEAD}"),
            });
        }
        Ok(())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or holds an
    /// out-of-range value, or if defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value has the wrong type
    /// or is out of range. `self` is left unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.user.email, "default@local");
        assert_eq!(parsed.metrics.weeks_ahead, 4);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[metrics]\nweeks_ahead = 6\n").unwrap();
        assert_eq!(parsed.metrics.weeks_ahead, 6);
        assert_eq!(parsed.user.units, "lb");
        assert_eq!(parsed.logging.max_bytes, 500_000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("metrics.weeks_ahead").as_deref(), Some("4"));
        assert_eq!(cfg.get("user.units").as_deref(), Some("lb"));
        assert!(cfg.get("user.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.apply("metrics.weeks_ahead", "8").unwrap();
        cfg.apply("user.units", "kg").unwrap();
        assert_eq!(cfg.metrics.weeks_ahead, 8);
        assert_eq!(cfg.user.units, "kg");
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("metrics.nonexistent", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_number() {
        let mut cfg = Config::default();
        let err = cfg.apply("metrics.weeks_ahead", "-1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.metrics.weeks_ahead, 4);
    }

    #[test]
    fn apply_rejects_weeks_ahead_past_limit() {
        let mut cfg = Config::default();
        for value in ["521", "18446744073709551615"] {
            let err = cfg.apply("metrics.weeks_ahead", value).unwrap_err();
            assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        }
        assert_eq!(cfg.metrics.weeks_ahead, 4);

        cfg.apply("metrics.weeks_ahead", "520").unwrap();
        assert_eq!(cfg.metrics.weeks_ahead, MAX_WEEKS_AHEAD);
    }

    #[test]
    fn apply_rejects_section_key() {
        let mut cfg = Config::default();
        assert!(cfg.apply("logging", "x").is_err());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.workouts.recent_limit, 20);
        assert!(path.exists());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut cfg = Config::default();
        cfg.apply("logging.level", "debug").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn load_from_rejects_out_of_range_weeks_ahead() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[metrics]\nweeks_ahead = 100000\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "metrics = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }
}
