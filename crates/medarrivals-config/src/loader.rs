//! Configuration loading utilities

use crate::Config;
use medarrivals_common::Result as ArrivalsResult;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "MEDARRIVALS_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for medarrivals_common::ArrivalsError {
    fn from(err: ConfigError) -> Self {
        medarrivals_common::ArrivalsError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |key| env::var(key).ok())
    }

    /// Load a YAML file, resolving overrides through `lookup`
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingConfig(path.display().to_string()));
        }
        debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_overrides_from(&mut config, lookup)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Defaults plus overrides, used when no file is found
    pub fn load_defaults_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        Self::apply_overrides_from(&mut config, lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration following the lookup order: explicit path,
    /// `MEDARRIVALS_CONFIG_PATH`, `config.yaml`, `config.yml`, defaults
    pub fn load(explicit: Option<&Path>) -> ArrivalsResult<Config> {
        let config = match Self::resolve_path(explicit, |key| env::var(key).ok()) {
            Some(path) => Self::load_config(path)?,
            None => {
                debug!("No configuration file found, using defaults");
                Self::load_defaults_with(|key| env::var(key).ok())?
            }
        };

        Ok(config)
    }

    /// Pick the configuration file to read, if any
    pub fn resolve_path<F>(explicit: Option<&Path>, lookup: F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = lookup(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        ["config.yaml", "config.yml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Apply overrides resolved through `lookup` (normally the process environment)
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source
        if let Some(url) = lookup("UNHCR_BASE_URL") {
            config.source.base_url = url;
        }

        if let Some(timeout) = lookup("UNHCR_TIMEOUT") {
            config.source.timeout_seconds = Some(parse_var("UNHCR_TIMEOUT", &timeout)?);
        }

        // Query
        if let Some(year) = lookup("START_YEAR") {
            config.query.start_year = parse_var("START_YEAR", &year)?;
        }

        if let Some(year) = lookup("END_YEAR") {
            config.query.end_year = parse_var("END_YEAR", &year)?;
        }

        // Output and boundaries
        if let Some(dir) = lookup("OUTPUT_DIR") {
            config.output.dir = PathBuf::from(dir);
        }

        if let Some(source) = lookup("BOUNDARIES_SOURCE") {
            config.boundaries.source = source;
        }

        // Graph
        if let Some(dpi) = lookup("GRAPH_DPI") {
            config.graph.dpi = parse_var("GRAPH_DPI", &dpi)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
