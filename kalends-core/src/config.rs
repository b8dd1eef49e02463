//! Global kalends configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::alarm::EventAlarm;
use crate::error::{KalendsError, KalendsResult};
use crate::event::DEFAULT_COLOR;
use crate::ics::DEFAULT_PRODUCT_ID;

static DEFAULT_EXPORT_DIR: &str = "~/kalends";

/// Prefix of environment variables overriding the file, e.g. `KALENDS_METHOD`.
pub const ENV_PREFIX: &str = "KALENDS";

/// Configuration at ~/.config/kalends/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct KalendsConfig {
    /// PRODID written in exported calendars
    pub product_id: String,
    /// METHOD written in exported calendars; empty or absent to omit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Color for events created without one
    pub default_color: String,
    /// Alarm lead time added to new events, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_alarm_minutes: Option<u32>,
    /// Where exported files go when no output path is given
    pub export_dir: PathBuf,
}

impl Default for KalendsConfig {
    fn default() -> Self {
        KalendsConfig {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            method: Some("PUBLISH".to_string()),
            default_color: DEFAULT_COLOR.to_string(),
            default_alarm_minutes: None,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

impl KalendsConfig {
    pub fn config_path() -> KalendsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| KalendsError::Config("Could not determine config directory".into()))?
            .join("kalends");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out file there
    /// on first use.
    pub fn load() -> KalendsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing), then apply `KALENDS_*`
    /// environment overrides.
    pub fn load_from(path: &Path) -> KalendsResult<Self> {
        let config: KalendsConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| KalendsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| KalendsError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save to ~/.config/kalends/config.toml
    pub fn save(&self) -> KalendsResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> KalendsResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| KalendsError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| KalendsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Export directory with `~` expanded.
    pub fn export_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.export_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// The alarm new events should start with, if any.
    pub fn default_alarm(&self) -> Option<EventAlarm> {
        self.default_alarm_minutes.map(EventAlarm::standard)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> KalendsResult<()> {
        let contents = format!(
            "\
# kalends configuration

# PRODID of exported calendars:
# product_id = \"{DEFAULT_PRODUCT_ID}\"

# METHOD of exported calendars (empty to omit):
# method = \"PUBLISH\"

# Color of new events:
# default_color = \"{DEFAULT_COLOR}\"

# Reminder added to new events, in minutes before start:
# default_alarm_minutes = 15

# Where exports are written by default:
# export_dir = \"{DEFAULT_EXPORT_DIR}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KalendsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| KalendsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = KalendsConfig::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.product_id, DEFAULT_PRODUCT_ID);
        assert_eq!(config.default_color, DEFAULT_COLOR);
        assert_eq!(config.export_dir, PathBuf::from("~/kalends"));
    }

    #[test]
    fn generated_default_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        KalendsConfig::create_default_config(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# product_id = \"-//Kalends//Calendar//EN\""));

        let config = KalendsConfig::load_from(&path).unwrap();
        assert_eq!(config.product_id, DEFAULT_PRODUCT_ID);
        assert_eq!(config.default_alarm_minutes, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "product_id = \"-//Acme//Planner//EN\"\ndefault_alarm_minutes = 30\n",
        )
        .unwrap();

        let config = KalendsConfig::load_from(&path).unwrap();
        assert_eq!(config.product_id, "-//Acme//Planner//EN");
        assert_eq!(config.default_alarm_minutes, Some(30));
        assert_eq!(config.default_color, DEFAULT_COLOR);
        assert_eq!(
            config.default_alarm().map(|a| a.minutes_before),
            Some(30)
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = KalendsConfig {
            method: Some("REQUEST".to_string()),
            default_color: "#112233".to_string(),
            default_alarm_minutes: Some(10),
            ..KalendsConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(KalendsConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "product_id = [unterminated").unwrap();

        let err = KalendsConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, KalendsError::Config(_)));
    }

    #[test]
    fn export_dir_expands_tilde() {
        let config = KalendsConfig::default();
        let expanded = config.export_path();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("kalends"));
    }
}
