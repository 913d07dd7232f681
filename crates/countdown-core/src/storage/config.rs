//! TOML-based application configuration.
//!
//! Holds the settings that shape a session rather than user preferences:
//! - Which zone (and optionally which year) the New Year target uses
//! - Drift policy of the one-second tick
//! - Audio backend used by the terminal front end
//! - Default log filter
//!
//! Configuration is stored at `<data_dir>/config.toml`. User preferences
//! (sound, tone, theme, wishes) live in the key-value store instead; see
//! [`crate::settings`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};
use crate::target::{TargetSpec, TargetZone};
use crate::timer::DriftPolicy;

/// Target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// `local` or a fixed offset such as `+07:00`.
    #[serde(default = "default_zone")]
    pub zone: String,
    /// Count down to this year's New Year instead of the next one.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Tick loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_drift")]
    pub drift: DriftPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    /// Terminal bell, one per note.
    Bell,
    /// Sine/square tones on the default output device.
    Rodio,
    /// No audio at all.
    None,
}

/// Audio configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_backend")]
    pub backend: AudioBackend,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing-subscriber` env-filter directive used when `COUNTDOWN_LOG`
    /// is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// Default functions
fn default_zone() -> String {
    "+07:00".into()
}
fn default_drift() -> DriftPolicy {
    DriftPolicy::Resync
}
fn default_backend() -> AudioBackend {
    AudioBackend::Bell
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            zone: default_zone(),
            year: None,
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            drift: default_drift(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
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
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    // Numbers may be cleared back to `null`; the typed
                    // round-trip below rejects that for required fields.
                    serde_json::Value::Number(_) => {
                        match serde_json::from_str::<serde_json::Value>(value) {
                            Ok(v @ (serde_json::Value::Number(_) | serde_json::Value::Null)) => v,
                            _ => return Err(invalid(format!("cannot parse '{value}' as number"))),
                        }
                    }
                    // Optional fields: numbers stay numbers, anything else is a string.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf value".into()));
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning the default config when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Like [`load`](Self::load) with an explicit path.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
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
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
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
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.target_spec()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The New Year target described by the `[target]` section.
    ///
    /// # Errors
    ///
    /// Returns an error if `target.zone` is not a valid zone.
    pub fn target_spec(&self) -> Result<TargetSpec, ValidationError> {
        let zone: TargetZone = self.target.zone.parse()?;
        Ok(TargetSpec::NewYear {
            zone,
            year: self.target.year,
        })
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
        assert_eq!(parsed.target.zone, "+07:00");
        assert_eq!(parsed.ticker.drift, DriftPolicy::Resync);
        assert_eq!(parsed.audio.backend, AudioBackend::Bell);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[target]\nzone = \"local\"\n").unwrap();
        assert_eq!(parsed.target.zone, "local");
        assert_eq!(parsed.target.year, None);
        assert_eq!(parsed.ticker.drift, DriftPolicy::Resync);
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("target.zone").as_deref(), Some("+07:00"));
        assert_eq!(cfg.get("ticker.drift").as_deref(), Some("resync"));
        assert_eq!(cfg.get("nope"), None);
    }

    #[test]
    fn update_by_dotted_key() {
        let mut cfg = Config::default();
        cfg.update("ticker.drift", "decrement").unwrap();
        assert_eq!(cfg.ticker.drift, DriftPolicy::Decrement);
        cfg.update("target.year", "2030").unwrap();
        assert_eq!(cfg.target.year, Some(2030));
        cfg.update("audio.backend", "none").unwrap();
        assert_eq!(cfg.audio.backend, AudioBackend::None);
    }

    #[test]
    fn update_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.update("target.year", "soon").is_err());
        assert!(cfg.update("ticker.drift", "sideways").is_err());
        assert!(cfg.update("target.zone", "mars").is_err());
        assert!(cfg.update("unknown.key", "1").is_err());
        assert_eq!(cfg.target.zone, "+07:00");
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.target.zone, "+07:00");

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn tick_period_is_not_configurable() {
        let mut cfg = Config::default();
        let err = cfg.update("ticker.interval_ms", "500").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));

        // Files written before the key was removed still load.
        let parsed: Config =
            toml::from_str("[ticker]\ninterval_ms = 500\ndrift = \"decrement\"\n").unwrap();
        assert_eq!(parsed.ticker.drift, DriftPolicy::Decrement);
        assert!(parsed.get("ticker.interval_ms").is_none());
    }

    #[test]
    fn year_can_be_cleared_or_negative() {
        let mut cfg = Config::default();
        cfg.update("target.year", "2030").unwrap();
        cfg.update("target.year", "null").unwrap();
        assert_eq!(cfg.target.year, None);

        cfg.update("target.year", "-44").unwrap();
        assert_eq!(cfg.target.year, Some(-44));
        cfg.update("target.year", "2031").unwrap();
        assert_eq!(cfg.target.year, Some(2031));
    }

    #[test]
    fn unreadable_file_is_an_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = [0xff, 0xfe, b'z', b'o', b'n', b'e'];
        std::fs::write(&path, bytes).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }
}
