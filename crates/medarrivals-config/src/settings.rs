//! Application configuration structures
//!
//! Defaults cover the standard run:
//! five countries, years 2014 to 2022, output under `output/`.

use medarrivals_common::{default_countries, CountrySpec, LoggingConfig, UnhcrConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Natural Earth 1:110m admin-0 countries
pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Statistics endpoint
    #[validate]
    pub source: SourceConfig,

    /// Countries and years to query
    #[validate]
    pub query: QueryConfig,

    /// Where CSV files and charts are written
    #[validate]
    pub output: OutputConfig,

    /// Country boundary layer for the per-country maps
    #[validate]
    pub boundaries: BoundariesConfig,

    /// Static chart rendering settings
    #[validate]
    pub graph: GraphSettings,

    /// Browser map settings
    #[validate]
    pub interactive: InteractiveConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// UNHCR endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Sublocation endpoint URL
    #[validate(url(message = "Source URL must be a valid URL"))]
    pub base_url: String,

    /// `sv_id` query parameter
    pub sv_id: u32,

    /// `population_group` query parameter
    pub population_group: u32,

    /// Request timeout in seconds; unset waits indefinitely
    #[validate(range(min = 1, max = 600, message = "Timeout must be between 1 and 600 seconds"))]
    pub timeout_seconds: Option<u64>,
}

/// Query plan configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QueryConfig {
    /// First year queried (inclusive)
    #[validate(range(min = 1990, max = 2100, message = "Start year must be between 1990 and 2100"))]
    pub start_year: i32,

    /// Last year queried (inclusive)
    #[validate(range(min = 1990, max = 2100, message = "End year must be between 1990 and 2100"))]
    pub end_year: i32,

    /// Countries queried, in request order
    #[validate(custom(function = "crate::validation::validate_countries", message = "Countries must be non-empty with unique names and geo ids"))]
    pub countries: Vec<CountrySpec>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Existing directory receiving all files
    pub dir: PathBuf,
}

/// Boundary layer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BoundariesConfig {
    /// GeoJSON FeatureCollection, as an http(s) URL or a local path
    #[validate(custom(function = "crate::validation::validate_boundaries_source", message = "Boundaries source must be a URL or a file path"))]
    pub source: String,

    /// Feature property holding the country name
    #[validate(length(min = 1, message = "Boundary name property cannot be empty"))]
    pub name_property: String,
}

/// Static chart rendering settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphSettings {
    /// Pixels per inch for all PNG outputs
    #[validate(range(min = 50, max = 600, message = "DPI must be between 50 and 600"))]
    pub dpi: u32,

    /// Bar chart size in inches (width)
    #[validate(range(min = 1.0, max = 40.0, message = "Chart width must be between 1 and 40 inches"))]
    pub chart_width_in: f64,

    /// Bar chart size in inches (height)
    #[validate(range(min = 1.0, max = 40.0, message = "Chart height must be between 1 and 40 inches"))]
    pub chart_height_in: f64,

    /// Map size in inches (width)
    #[validate(range(min = 1.0, max = 40.0, message = "Map width must be between 1 and 40 inches"))]
    pub map_width_in: f64,

    /// Map size in inches (height)
    #[validate(range(min = 1.0, max = 40.0, message = "Map height must be between 1 and 40 inches"))]
    pub map_height_in: f64,

    /// Font family for all text
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Axis and legend font size in points
    #[validate(range(min = 4, max = 72, message = "Font size must be between 4 and 72"))]
    pub font_size: u32,

    /// Title font size in points
    #[validate(range(min = 4, max = 72, message = "Title font size must be between 4 and 72"))]
    pub title_font_size: u32,

    /// Figure background (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Single-series bar color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Bar color must be valid hex color"))]
    pub bar_color: String,

    /// Country boundary fill (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Boundary color must be valid hex color"))]
    pub boundary_color: String,

    /// Marker area in points² is `individuals / marker_size_divisor`
    #[validate(range(min = 0.001, message = "Marker size divisor must be positive"))]
    pub marker_size_divisor: f64,

    /// Marker opacity on the maps
    #[validate(range(min = 0.0, max = 1.0, message = "Marker alpha must be between 0 and 1"))]
    pub marker_alpha: f64,

    /// Grid line opacity on the maps
    #[validate(range(min = 0.0, max = 1.0, message = "Grid alpha must be between 0 and 1"))]
    pub grid_alpha: f64,
}

/// Interactive browser map settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InteractiveConfig {
    /// Whether the animated map is produced at all
    pub enabled: bool,

    /// Whether the system browser is launched on the generated page
    pub open_browser: bool,

    /// Plotly bundle loaded by the generated page
    #[validate(url(message = "Plotly URL must be a valid URL"))]
    pub plotly_js_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Log file path contains invalid characters"))]
    pub file: Option<String>,

    /// Whether to use colored output (for console logging)
    pub colored: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let client = UnhcrConfig::default();
        Self {
            base_url: client.base_url,
            sv_id: client.sv_id,
            population_group: client.population_group,
            timeout_seconds: None,
        }
    }
}

impl SourceConfig {
    /// Client configuration for this endpoint
    pub fn client_config(&self) -> UnhcrConfig {
        let config = UnhcrConfig::new(self.base_url.clone()).with_query(self.sv_id, self.population_group);
        match self.timeout_seconds {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            start_year: 2014,
            end_year: 2022,
            countries: default_countries(),
        }
    }
}

impl QueryConfig {
    /// Inclusive year range
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

impl Default for BoundariesConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_BOUNDARIES_URL.to_string(),
            name_property: "NAME".to_string(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            chart_width_in: 6.4,
            chart_height_in: 4.8,
            map_width_in: 8.0,
            map_height_in: 6.0,
            font_family: "sans-serif".to_string(),
            font_size: 6,
            title_font_size: 10,
            background_color: "#FFFFFF".to_string(),
            bar_color: "#1F77B4".to_string(),
            boundary_color: "#D3D3D3".to_string(),
            marker_size_divisor: 100.0,
            marker_alpha: 0.5,
            grid_alpha: 0.5,
        }
    }
}

impl GraphSettings {
    /// Bar chart size in pixels
    pub fn chart_pixels(&self) -> (u32, u32) {
        (
            inches_to_pixels(self.chart_width_in, self.dpi),
            inches_to_pixels(self.chart_height_in, self.dpi),
        )
    }

    /// Map size in pixels
    pub fn map_pixels(&self) -> (u32, u32) {
        (
            inches_to_pixels(self.map_width_in, self.dpi),
            inches_to_pixels(self.map_height_in, self.dpi),
        )
    }

    /// Convert a point size to pixels at the configured DPI
    pub fn points_to_pixels(&self, points: u32) -> u32 {
        ((points as f64) * self.dpi as f64 / 72.0).round() as u32
    }
}

fn inches_to_pixels(inches: f64, dpi: u32) -> u32 {
    (inches * dpi as f64).round() as u32
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            open_browser: true,
            plotly_js_url: "https://cdn.plot.ly/plotly-2.27.0.min.js".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            colored: true,
        }
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            colored: settings.colored,
            file_path: settings.file.as_ref().map(PathBuf::from),
            ..LoggingConfig::default()
        }
    }
}

impl Config {
    /// Field validation plus the checks that span several fields
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;

        let mut errors = validator::ValidationErrors::new();
        if self.query.start_year > self.query.end_year {
            errors.add("query", validator::ValidationError::new("start_year_after_end_year"));
        }
        if self.output.dir.as_os_str().is_empty() {
            errors.add("output", validator::ValidationError::new("empty_output_dir"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.query.start_year, 2014);
        assert_eq!(config.query.end_year, 2022);
        assert_eq!(config.query.countries.len(), 5);
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert_eq!(config.source.sv_id, 11);
        assert_eq!(config.source.population_group, 4797);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).expect("Failed to serialize to YAML");
        assert!(yaml.contains("source:"));
        assert!(yaml.contains("boundary: Italy"));

        let deserialized: Config = serde_yaml::from_str(&yaml).expect("Failed to deserialize from YAML");
        assert_eq!(deserialized.query.countries, config.query.countries);
        assert_eq!(deserialized.graph.dpi, config.graph.dpi);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "
query:
  start_year: 2016
  end_year: 2018
graph:
  dpi: 100
";
        let config: Config = serde_yaml::from_str(yaml).expect("Failed to parse partial config");
        assert!(config.validate_all().is_ok());
        assert_eq!(config.query.years(), 2016..=2018);
        assert_eq!(config.query.countries.len(), 5);
        assert_eq!(config.graph.dpi, 100);
        assert_eq!(config.graph.font_size, 6);
        assert!(config.interactive.enabled);
    }

    #[test]
    fn test_year_order_is_checked() {
        let mut config = Config::default();
        config.query.start_year = 2022;
        config.query.end_year = 2014;
        assert!(config.validate().is_ok());
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_graph_settings_validation() {
        let mut graph = GraphSettings::default();
        assert!(graph.validate().is_ok());

        graph.dpi = 10;
        assert!(graph.validate().is_err());

        graph.dpi = 300;
        graph.boundary_color = "lightgrey".to_string();
        assert!(graph.validate().is_err());

        graph.boundary_color = "#D3D3D3".to_string();
        graph.marker_alpha = 1.5;
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_pixel_sizes() {
        let graph = GraphSettings::default();
        assert_eq!(graph.chart_pixels(), (1920, 1440));
        assert_eq!(graph.map_pixels(), (2400, 1800));
        assert_eq!(graph.points_to_pixels(6), 25);
        assert_eq!(graph.points_to_pixels(72), 300);
    }

    #[test]
    fn test_source_validation() {
        let mut source = SourceConfig::default();
        assert!(source.validate().is_ok());

        source.base_url = "not_a_url".to_string();
        assert!(source.validate().is_err());

        source.base_url = "http://localhost:9000/sublocation".to_string();
        source.timeout_seconds = Some(0);
        assert!(source.validate().is_err());

        source.timeout_seconds = Some(30);
        let client = source.client_config();
        assert_eq!(client.timeout_secs, Some(30));
        assert_eq!(client.base_url, "http://localhost:9000/sublocation");
    }

    #[test]
    fn test_logging_settings_conversion() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            file: Some("/tmp/medarrivals.log".to_string()),
            colored: false,
        };
        assert!(settings.validate().is_ok());

        let config = LoggingConfig::from(&settings);
        assert_eq!(config.level, "debug");
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/medarrivals.log")));
        assert!(!config.colored);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate_all().is_err());
    }
}
