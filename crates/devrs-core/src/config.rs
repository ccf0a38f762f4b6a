// Devrs Runtime Config
// Optional TOML configuration for the CLI (table path, model override, polling)

use std::path::{Path, PathBuf};

/// Runtime configuration for the devrs CLI
///
/// Loaded from a TOML file (default: ~/.config/devrs/config.toml).
/// Everything here can also be supplied on the command line, which takes
/// precedence.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the device table CSV
    table_path: Option<PathBuf>,

    /// Fixed model identifier override (skips the ambient provider)
    model_override: Option<String>,

    /// Watch-loop polling interval in milliseconds
    poll_interval_ms: Option<u64>,
}

/// Errors that can occur when loading the config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Interval out of range: {0}")]
    IntervalOutOfRange(String),
}

/// TOML representation for deserializing the config
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    #[serde(default)]
    table: Option<TableToml>,

    #[serde(default)]
    device: Option<DeviceToml>,

    #[serde(default)]
    watch: Option<WatchToml>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TableToml {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DeviceToml {
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct WatchToml {
    #[serde(default)]
    poll_interval_ms: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        let mut config = Self::default();

        if let Some(table) = toml_config.table {
            config.table_path = table.path;
        }
        if let Some(device) = toml_config.device {
            config.model_override = device.model;
        }
        if let Some(watch) = toml_config.watch {
            if let Some(interval) = watch.poll_interval_ms {
                if !(10..=10_000).contains(&interval) {
                    return Err(ConfigError::IntervalOutOfRange(format!(
                        "watch.poll_interval_ms must be 10-10000ms, got {}",
                        interval
                    )));
                }
                config.poll_interval_ms = Some(interval);
            }
        }

        Ok(config)
    }

    /// Get the default config path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("devrs").join("config.toml"))
    }

    /// Load from the default location, or empty config if the file
    /// doesn't exist
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Configured device table path
    pub fn table_path(&self) -> Option<&Path> {
        self.table_path.as_deref()
    }

    /// Configured model identifier override
    pub fn model_override(&self) -> Option<&str> {
        self.model_override.as_deref()
    }

    /// Configured polling interval
    pub fn poll_interval_ms(&self) -> Option<u64> {
        self.poll_interval_ms
    }
}

/// Create default config content for a new installation
pub fn default_config_content() -> &'static str {
    r#"# Devrs Configuration
# Place this file at: ~/.config/devrs/config.toml

[table]
# Path to the device table CSV
# path = "/usr/share/devrs/ios_devices.csv"

[device]
# Fixed model identifier override (normally the model comes from the
# DEVRS_MODEL environment variable or --model / --model-file)
# model = "iPhone14,2"

[watch]
# Polling interval for --watch mode, in milliseconds (10-10000)
poll_interval_ms = 500
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.table_path(), None);
        assert_eq!(config.model_override(), None);
        assert_eq!(config.poll_interval_ms(), None);
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
[table]
path = "/tmp/devices.csv"

[device]
model = "iPhone14,2"

[watch]
poll_interval_ms = 250
"#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.table_path(), Some(Path::new("/tmp/devices.csv")));
        assert_eq!(config.model_override(), Some("iPhone14,2"));
        assert_eq!(config.poll_interval_ms(), Some(250));
    }

    #[test]
    fn test_config_empty_toml() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.table_path(), None);
    }

    #[test]
    fn test_config_interval_out_of_range() {
        let too_small = Config::from_toml("[watch]\npoll_interval_ms = 5\n");
        assert!(matches!(too_small, Err(ConfigError::IntervalOutOfRange(_))));

        let too_large = Config::from_toml("[watch]\npoll_interval_ms = 60000\n");
        assert!(matches!(too_large, Err(ConfigError::IntervalOutOfRange(_))));
    }

    #[test]
    fn test_config_unknown_field_rejected() {
        let result = Config::from_toml("[table]\npaht = \"typo.csv\"\n");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_default_content_parses() {
        let config = Config::from_toml(default_config_content()).unwrap();
        assert_eq!(config.poll_interval_ms(), Some(500));
    }
}
