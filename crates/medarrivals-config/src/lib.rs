//! Configuration management for medarrivals

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    BoundariesConfig, Config, GraphSettings, InteractiveConfig, LoggingSettings, OutputConfig,
    QueryConfig, SourceConfig,
};
