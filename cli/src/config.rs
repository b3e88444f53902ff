//! Operator Configuration
//!
//! Handles loading and saving pool configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cloak_hash::{Blake3Oracle, HashOracle, PoseidonOracle};
use cloak_pool::{Address, PoolConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full operator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloakConfig {
    /// Pool parameters
    #[serde(default)]
    pub pool: PoolConfig,

    /// Hash oracle and administrators
    #[serde(default)]
    pub ledger: LedgerSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CloakConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Load from an explicit path, or from the data directory if a config
    /// exists there, or fall back to the local profile
    pub fn resolve(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = config {
            return Self::load(&path);
        }

        let path = default_config_path(&data_dir.unwrap_or_else(|| default_data_dir("local")));
        match Self::load(&path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::local()),
            other => other,
        }
    }

    /// Create configuration for a named profile
    pub fn for_profile(profile: &str) -> Self {
        match profile {
            "production" => Self::production(),
            _ => Self::local(),
        }
    }

    /// Local development configuration
    pub fn local() -> Self {
        Self {
            pool: PoolConfig::local(),
            ledger: LedgerSettings {
                oracle: OracleKind::Poseidon,
                admins: vec![dev_admin()],
            },
            logging: LoggingSettings {
                level: "debug".to_string(),
                ..Default::default()
            },
        }
    }

    /// Production configuration; administrators must be filled in
    pub fn production() -> Self {
        Self {
            pool: PoolConfig::production(),
            ledger: LedgerSettings::default(),
            logging: LoggingSettings {
                format: "json".to_string(),
                ..Default::default()
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.ledger.admins.iter().any(Address::is_null) {
            return Err(ConfigError::Invalid(
                "Administrator address cannot be null".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

/// Which two-to-one hash the accumulator uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    #[default]
    Poseidon,
    Blake3,
}

impl OracleKind {
    pub fn build(&self) -> Arc<dyn HashOracle> {
        match self {
            OracleKind::Poseidon => Arc::new(PoseidonOracle::new()),
            OracleKind::Blake3 => Arc::new(Blake3Oracle),
        }
    }
}

/// Ledger collaborator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Hash oracle for the accumulator
    #[serde(default)]
    pub oracle: OracleKind,

    /// Addresses allowed to register assets and pause the pool
    #[serde(default)]
    pub admins: Vec<Address>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Well-known administrator of local development pools
pub fn dev_admin() -> Address {
    Address::from_bytes([0xad; 20])
}

/// Get default data directory
pub fn default_data_dir(profile: &str) -> PathBuf {
    let base = directories::ProjectDirs::from("network", "cloak", "cloak")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".cloak"));

    base.join(profile)
}

/// Get default config file path
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}
