//! Application configuration module
//!
//! Provides configuration management with TOML file support,
//! environment variable integration, and sensible defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// How the shell hands input to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_true")]
    pub trim_input: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_filter_env")]
    pub filter_env: String,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_ids: bool,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_filter_env() -> String {
    "MEMTODO_LOG".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            trim_input: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            filter_env: default_log_filter_env(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_ids: default_true(),
            prompt: default_prompt(),
        }
    }
}

impl Config {
    /// Returns the configuration directory path (~/.config/memtodo/)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("memtodo");
        Ok(config_dir)
    }

    /// Returns the configuration file path (~/.config/memtodo/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or return default if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or return default if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Tracing filter directive: the override env var if set, else `logging.level`.
    pub fn log_filter(&self) -> String {
        env::var(&self.logging.filter_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.logging.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert!(config.store.trim_input);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.filter_env, "MEMTODO_LOG");
        assert!(config.display.show_ids);
        assert_eq!(config.display.prompt, "> ");
    }

    #[test]
    fn test_config_load_from_toml() {
        let toml_content = r#"
[store]
trim_input = false

[logging]
level = "debug"
filter_env = "CUSTOM_LOG"

[display]
show_ids = false
prompt = "todo> "
"#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert!(!config.store.trim_input);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.filter_env, "CUSTOM_LOG");
        assert!(!config.display.show_ids);
        assert_eq!(config.display.prompt, "todo> ");
    }

    #[test]
    fn test_config_partial_toml() {
        let toml_content = r#"
[display]
prompt = "$ "
"#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.display.prompt, "$ ");
        assert!(config.display.show_ids);
        assert!(config.store.trim_input);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path().expect("Failed to get config path");
        assert!(config_path.ends_with("memtodo/config.toml"));
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = assert_ok!(Config::load_from(&dir.path().join("absent.toml")));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.display.prompt = "todo> ".to_string();
        assert_ok!(config.save_to(&path));

        let loaded = assert_ok!(Config::load_from(&path));
        assert_eq!(loaded.display.prompt, "todo> ");
    }

    #[test]
    fn test_load_from_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display\nprompt = ").unwrap();

        assert_err!(Config::load_from(&path));
    }

    #[test]
    fn test_log_filter_uses_level_when_env_unset() {
        let mut config = Config::default();
        config.logging.filter_env = "MEMTODO_TEST_MISSING_LOG_12345".to_string();
        config.logging.level = "info".to_string();

        temp_env::with_var_unset("MEMTODO_TEST_MISSING_LOG_12345", || {
            assert_eq!(config.log_filter(), "info");
        });
    }

    #[test]
    fn test_log_filter_env_override() {
        let mut config = Config::default();
        config.logging.filter_env = "MEMTODO_TEST_LOG".to_string();

        temp_env::with_var("MEMTODO_TEST_LOG", Some("memtodo_core=trace"), || {
            assert_eq!(config.log_filter(), "memtodo_core=trace");
        });
    }

    #[test]
    fn test_log_filter_ignores_blank_env() {
        let mut config = Config::default();
        config.logging.filter_env = "MEMTODO_TEST_BLANK_LOG".to_string();

        temp_env::with_var("MEMTODO_TEST_BLANK_LOG", Some("  "), || {
            assert_eq!(config.log_filter(), "warn");
        });
    }
}
