//! Structured logging infrastructure

use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "medarrivals_data=trace")
    pub level: String,
    /// Whether to use ANSI colours on the console
    pub colored: bool,
    /// Optional file path for log output (appended to)
    pub file_path: Option<PathBuf>,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colored: true,
            file_path: None,
            include_targets: true,
        }
    }
}

/// Build the filter for `level`, falling back to `info` for an invalid directive
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(build_filter(&config.level));

    let layer = fmt::layer().with_target(config.include_targets);

    if let Some(file_path) = config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        registry
            .with(layer.with_ansi(false).with_writer(file))
            .try_init()?;
    } else {
        registry.with(layer.with_ansi(config.colored)).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.colored);
        assert!(config.file_path.is_none());
        assert!(config.include_targets);
    }

    #[test]
    fn test_invalid_level_falls_back() {
        assert!(EnvFilter::try_new("medarrivals=notalevel").is_err());
        let _ = build_filter("medarrivals=notalevel");
        let _ = build_filter("medarrivals_data=debug");
    }
}
