use crate::domain::TimerSettings;
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read error: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML parse error: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {source}")]
    Serialize {
        #[from]
        source: toml::ser::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub timer: TimerSettings,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub sound_enabled: bool,
    pub urgency: NotificationUrgency,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationUrgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
            urgency: NotificationUrgency::Normal,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tomate")
            .join("config.toml")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tomate")
    }

    pub fn database_path() -> PathBuf {
        Self::data_dir().join("tomate.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();

        assert_eq!(config.general.language, Language::En);
        assert_eq!(config.timer.focus_duration_minutes.get(), 25);
        assert_eq!(config.timer.short_break_duration_minutes.get(), 5);
        assert_eq!(config.timer.long_break_duration_minutes.get(), 15);
        assert_eq!(config.timer.long_break_interval.get(), 4);
        assert!(!config.timer.auto_start_breaks);
        assert!(!config.timer.auto_start_pomodoros);
        assert!(config.notifications.enabled);
        assert!(config.notifications.sound_enabled);
        assert_eq!(config.notifications.urgency, NotificationUrgency::Normal);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [timer]
            focus_duration_minutes = 50
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.timer.focus_duration_minutes.get(), 50);
        assert_eq!(config.timer.short_break_duration_minutes.get(), 5);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [general]
            language = "fr"

            [timer]
            focus_duration_minutes = 45
            short_break_duration_minutes = 10
            long_break_duration_minutes = 30
            long_break_interval = 3
            auto_start_breaks = true
            auto_start_pomodoros = true

            [notifications]
            enabled = false
            sound_enabled = false
            urgency = "critical"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.general.language, Language::Fr);
        assert_eq!(config.timer.focus_duration_minutes.get(), 45);
        assert_eq!(config.timer.short_break_duration_minutes.get(), 10);
        assert_eq!(config.timer.long_break_duration_minutes.get(), 30);
        assert_eq!(config.timer.long_break_interval.get(), 3);
        assert!(config.timer.auto_start_breaks);
        assert!(config.timer.auto_start_pomodoros);
        assert!(!config.notifications.enabled);
        assert!(!config.notifications.sound_enabled);
        assert_eq!(config.notifications.urgency, NotificationUrgency::Critical);
    }

    #[test]
    fn zero_duration_is_a_parse_error() {
        let toml = r#"
            [timer]
            short_break_duration_minutes = 0
        "#;

        let result: Result<Config, _> = toml::from_str(toml);

        assert!(result.is_err());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let path = std::env::temp_dir().join("tomate-missing-config-4242.toml");
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.timer, TimerSettings::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir()
            .join(format!("tomate-config-test-{}", std::process::id()))
            .join("config.toml");

        let mut config = Config::default();
        config.general.language = Language::Fr;
        config.timer.auto_start_breaks = true;
        config.notifications.urgency = NotificationUrgency::Low;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.general.language, Language::Fr);
        assert!(loaded.timer.auto_start_breaks);
        assert_eq!(loaded.notifications.urgency, NotificationUrgency::Low);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
