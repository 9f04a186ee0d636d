//! Configuration module for the probabilistic data structures.
//!
//! This module provides a configuration system that can load structure
//! parameters from files (TOML, YAML, JSON) and override them with environment
//! variables. All configuration values are validated for correctness before use.

use std::path::{Path, PathBuf};

use crate::error::config::ConfigError;
use config::{Config, ConfigError as ExternalConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data_structures::bloom_filter::BloomFilterConfig;
use crate::data_structures::cardinality::CardinalityConfig;
use crate::data_structures::cuckoo_filter::CuckooFilterConfig;
use crate::data_structures::quotient_filter::QuotientFilterConfig;

pub mod sections;

pub use sections::HashingConfig;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MAUKA_PDS";

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Parameters for every structure in the crate, plus logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PdsConfig {
    /// Hash seeding
    pub hashing: HashingConfig,

    /// Bloom filter sizing
    pub bloom: BloomFilterConfig,

    /// Cuckoo filter geometry
    pub cuckoo: CuckooFilterConfig,

    /// Quotient filter widths
    pub quotient: QuotientFilterConfig,

    /// Cardinality estimator sizing
    pub cardinality: CardinalityConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl PdsConfig {
    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}

impl Validate for PdsConfig {
    fn validate(&self) -> ConfigResult<()> {
        // Section configs also carry inherent validators returning PdsResult.
        Validate::validate(&self.hashing)?;
        Validate::validate(&self.bloom)?;
        Validate::validate(&self.cuckoo)?;
        Validate::validate(&self.quotient)?;
        Validate::validate(&self.cardinality)?;
        self.log.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError {
                section: "log",
                message: format!("Invalid log level: {}", self.level),
            }),
        }
    }
}

/// Configuration loader: defaults, then an optional file, then environment.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from a file and environment variables.
    ///
    /// Environment keys take the form `MAUKA_PDS__BLOOM__EXPECTED_ITEMS`.
    pub fn load(&self) -> ConfigResult<PdsConfig> {
        let mut builder = Config::builder();

        builder = builder.add_source(
            Config::try_from(&PdsConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => config::FileFormat::Toml,
                Some("json") => config::FileFormat::Json,
                Some("yaml" | "yml") => config::FileFormat::Yaml,
                _ => {
                    return Err(ConfigError::ParseError(format!(
                        "Unsupported file extension for: {path:?}"
                    )))
                }
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| match e {
            ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
            ExternalConfigError::PathParse(path) => {
                ConfigError::ParseError(format!("Invalid path: {path:?}"))
            }
            ExternalConfigError::FileParse { uri, cause } => ConfigError::ParseError(format!(
                "Error parsing {}: {cause}",
                uri.unwrap_or_else(|| "config file".to_string())
            )),
            ExternalConfigError::Foreign(err) => ConfigError::ParseError(err.to_string()),
            ExternalConfigError::Frozen => {
                ConfigError::ParseError("Configuration is frozen".to_string())
            }
            ExternalConfigError::Message(msg) => ConfigError::ParseError(msg),
            ExternalConfigError::Type { .. } => {
                ConfigError::ParseError("Type conversion error".to_string())
            }
        })?;

        let pds_config: PdsConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        pds_config.validate()?;
        tracing::debug!(path = ?self.config_path, "configuration loaded");

        Ok(pds_config)
    }
}
