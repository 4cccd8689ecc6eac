//! Utility functions used across the pipeline

use crate::{ArrivalsError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Format an integer with `,` thousands separators (`1234567` -> `1,234,567`)
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse the portal's `date` field.
///
/// Accepts a plain date, a date with time (space or `T` separated), and
/// ignores anything after the time part.
pub fn parse_update_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw.get(..19).unwrap_or(raw), format) {
            return Ok(datetime.date());
        }
    }
    Err(ArrivalsError::validation_field(
        format!("'{}' is not a recognised date", raw),
        "date",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(181_436), "181,436");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-45_000), "-45,000");
    }

    #[test]
    fn test_parse_update_date() {
        let expected = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        assert_eq!(parse_update_date("2022-12-31").unwrap(), expected);
        assert_eq!(parse_update_date("2022-12-31 00:00:00").unwrap(), expected);
        assert_eq!(parse_update_date("2022-12-31T08:15:00+00:00").unwrap(), expected);
        assert!(parse_update_date("31/12/2022").is_err());
    }
}
