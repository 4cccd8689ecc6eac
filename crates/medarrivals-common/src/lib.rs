//! Common types, errors, logging and the UNHCR client for medarrivals

pub mod error;
pub mod logging;
pub mod macros;
pub mod types;
pub mod unhcr;
pub mod utils;

// Re-export commonly used types
pub use error::{ArrivalsError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use types::*;
pub use unhcr::{parse_sublocation_response, SublocationRecord, UnhcrClient, UnhcrConfig};
pub use utils::{format_thousands, parse_update_date};
