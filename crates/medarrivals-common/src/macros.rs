//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `ArrivalsError`
///
/// # Examples
///
/// ```rust
/// use medarrivals_common::bail;
/// use medarrivals_common::Result;
///
/// fn check_year(year: i32) -> Result<()> {
///     if year < 2014 {
///         bail!("Year out of range: {}", year);
///     }
///     Ok(())
/// }
///
/// assert!(check_year(2013).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::ArrivalsError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::ArrivalsError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::ArrivalsError::new(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but for `ArrivalsError`
///
/// # Examples
///
/// ```rust
/// use medarrivals_common::ensure;
/// use medarrivals_common::Result;
///
/// fn validate_count(value: i64) -> Result<()> {
///     ensure!(value >= 0, "Count must not be negative, got: {}", value);
///     Ok(())
/// }
///
/// assert!(validate_count(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::ArrivalsError::new($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::ArrivalsError::new($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::ArrivalsError::new(format!($fmt, $($arg)*)));
        }
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use medarrivals_common::{with_context, Result};
///
/// fn read_boundaries(path: &str) -> Result<String> {
///     std::fs::read_to_string(path)
///         .map_err(|e| with_context!(e, "Failed to read boundary file {}", path))
/// }
///
/// assert!(read_boundaries("/nonexistent/countries.geojson").is_err());
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::ArrivalsError::with_source($msg, $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::ArrivalsError::with_source(format!($fmt, $($arg)*), $err)
    };
}
