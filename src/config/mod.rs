use crate::dialect::Direction;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine configuration, loaded from `~/.psconvert/config.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Extra CMD -> PowerShell mappings added on top of the built-in table
    #[serde(default)]
    pub custom_mappings: Vec<CustomMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Direction used when a caller asks for `Auto` and detection is disabled
    #[serde(default)]
    pub default_direction: Direction,

    /// Record successful conversions in the history
    #[serde(default = "default_true")]
    pub record_history: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Consult the remote lookup when no local conversion is known
    #[serde(default)]
    pub enabled: bool,

    /// Upper bound for a single lookup, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Completed lookups kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Persist history and settings to disk
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Data directory; `~/.psconvert/data` when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Time limit for each store call
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMapping {
    pub cmd: String,
    pub powershell: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_cache_capacity() -> usize {
    256
}

fn default_store_timeout_ms() -> u64 {
    2000
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_direction: Direction::Auto,
            record_history: true,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: default_timeout_ms(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist: true,
            data_dir: None,
            timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl LookupConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl StorageConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured data directory, or the default one under the home directory
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Config::config_dir()?.join("data")),
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path.as_ref(), contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get default configuration path
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;

        Ok(home.join(".psconvert"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.conversion.default_direction, Direction::Auto);
        assert!(config.conversion.record_history);
        assert!(!config.lookup.enabled);
        assert_eq!(config.lookup.timeout(), Duration::from_secs(5));
        assert_eq!(config.lookup.cache_capacity, 256);
        assert!(config.custom_mappings.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
conversion:
  default_direction: powershell_to_cmd
lookup:
  enabled: true
  timeout_ms: 250
custom_mappings:
  - cmd: ll
    powershell: Get-ChildItem -Force
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.conversion.default_direction, Direction::PowerShellToCmd);
        assert!(config.conversion.record_history);
        assert!(config.lookup.enabled);
        assert_eq!(config.lookup.timeout_ms, 250);
        assert_eq!(config.lookup.cache_capacity, 256);
        assert_eq!(config.custom_mappings[0].cmd, "ll");
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.storage.persist);
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.storage.timeout(), Duration::from_secs(2));
    }
}
