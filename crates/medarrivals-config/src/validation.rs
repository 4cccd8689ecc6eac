//! Validation utilities and regex patterns

use medarrivals_common::CountrySpec;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #D3D3D3)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate the log level directive
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon is allowed for Windows drive letters (C:\)
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

/// Boundary data comes from an http(s) URL or a local file
pub fn validate_boundaries_source(source: &str) -> Result<(), ValidationError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return url::Url::parse(source)
            .map(|_| ())
            .map_err(|_| ValidationError::new("invalid_boundaries_url"));
    }
    validate_file_path(source)
}

/// Country list must be non-empty with unique, non-blank names and geo ids
pub fn validate_countries(countries: &[CountrySpec]) -> Result<(), ValidationError> {
    if countries.is_empty() {
        return Err(ValidationError::new("no_countries"));
    }

    let mut names = HashSet::new();
    let mut geo_ids = HashSet::new();
    for country in countries {
        if country.name.trim().is_empty() {
            return Err(ValidationError::new("empty_country_name"));
        }
        if validate_file_path(&country.name).is_err() || country.name.contains(['/', '\\']) {
            return Err(ValidationError::new("country_name_not_file_safe"));
        }
        if !names.insert(country.name.as_str()) {
            return Err(ValidationError::new("duplicate_country_name"));
        }
        if !geo_ids.insert(country.geo_id) {
            return Err(ValidationError::new("duplicate_geo_id"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medarrivals_common::default_countries;

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#d3d3d3"));
        assert!(HEX_COLOR_REGEX.is_match("#1F77b4"));

        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF")); // Missing #
        assert!(!HEX_COLOR_REGEX.is_match("#FFF")); // Too short
        assert!(!HEX_COLOR_REGEX.is_match("#FFFFFFF")); // Too long
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG"));
        assert!(!HEX_COLOR_REGEX.is_match(""));
    }

    #[test]
    fn test_validate_log_level() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(validate_log_level(level).is_ok(), "{} should be valid", level);
        }
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("output").is_ok());
        assert!(validate_file_path("/var/log/medarrivals.log").is_ok());
        assert!(validate_file_path("C:\\data\\countries.geojson").is_ok());

        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("out<put").is_err());
        assert!(validate_file_path("what?.csv").is_err());
    }

    #[test]
    fn test_validate_boundaries_source() {
        assert!(validate_boundaries_source("https://example.org/countries.geojson").is_ok());
        assert!(validate_boundaries_source("data/ne_110m_admin_0_countries.geojson").is_ok());

        assert!(validate_boundaries_source("https://").is_err());
        assert!(validate_boundaries_source("").is_err());
    }

    #[test]
    fn test_validate_countries() {
        assert!(validate_countries(&default_countries()).is_ok());
        assert!(validate_countries(&[]).is_err());

        let duplicate_id = vec![CountrySpec::new("Italy", 656), CountrySpec::new("Italia", 656)];
        assert!(validate_countries(&duplicate_id).is_err());

        let duplicate_name = vec![CountrySpec::new("Italy", 656), CountrySpec::new("Italy", 657)];
        assert!(validate_countries(&duplicate_name).is_err());

        assert!(validate_countries(&[CountrySpec::new("  ", 1)]).is_err());
        assert!(validate_countries(&[CountrySpec::new("a/b", 1)]).is_err());
    }
}
