//! Error types and utilities for medarrivals

use thiserror::Error;

/// Result type alias for medarrivals operations
pub type Result<T> = std::result::Result<T, ArrivalsError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the arrivals pipeline
#[derive(Error, Debug)]
pub enum ArrivalsError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport level failures (connect, timeout, body read)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The statistics endpoint answered, but not with something usable
    #[error("Source API error: {message}")]
    Source {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart and map rendering errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A value that could not be coerced or violates a data invariant
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl ArrivalsError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new source API error
    pub fn source_api(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new source API error carrying the HTTP status
    pub fn source_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Source {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status attached to a source error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Source { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

/// Convert from reqwest::Error to ArrivalsError
impl From<reqwest::Error> for ArrivalsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::network_with_source(format!("HTTP error: {}", status_code), err)
        } else if err.is_decode() {
            Self::network_with_source("Failed to decode response body", err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to ArrivalsError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for ArrivalsError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
