//! Graph configuration types

use medarrivals_config::GraphSettings;
use serde::{Deserialize, Serialize};

/// Colour schemes available to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Ten-colour qualitative palette
    Default,
    /// Perceptually uniform dark purple to yellow ramp
    Viridis,
    /// Sequential white to dark blue ramp
    Blues,
    /// Explicit list of hex colours
    Custom(Vec<String>),
}

/// Font configuration, size in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 25,
        }
    }
}

/// Margin configuration in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 40,
            right: 60,
            bottom: 120,
            left: 180,
        }
    }
}

impl MarginConfig {
    /// Margins proportional to the figure height
    pub fn scaled(height: u32) -> Self {
        let unit = (height / 36).max(4);
        Self {
            top: unit,
            right: unit * 2,
            bottom: unit * 3,
            left: unit * 5,
        }
    }
}

/// Styling shared by all static charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub color_scheme: ColorScheme,
    pub background_color: Option<String>,
    /// Fill of single-series bars
    pub bar_color: String,
    /// Fill of country boundaries on maps
    pub boundary_color: String,
    pub title_font: FontConfig,
    pub axis_font: FontConfig,
    pub margins: MarginConfig,
    /// Marker area in points² is `individuals / marker_size_divisor`
    pub marker_size_divisor: f64,
    pub marker_alpha: f64,
    pub grid_alpha: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            background_color: Some("#FFFFFF".to_string()),
            bar_color: "#1F77B4".to_string(),
            boundary_color: "#D3D3D3".to_string(),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 42,
            },
            axis_font: FontConfig::default(),
            margins: MarginConfig::default(),
            marker_size_divisor: 100.0,
            marker_alpha: 0.5,
            grid_alpha: 0.5,
        }
    }
}

/// Everything a renderer needs besides its data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Pixels per inch, used to turn point sizes into pixels
    pub dpi: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: StyleConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            title: "Graph".to_string(),
            width: 1920,
            height: 1440,
            dpi: 300,
            x_label: None,
            y_label: None,
            style: StyleConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Bar chart configuration at the configured chart size
    pub fn bar_chart(settings: &GraphSettings, title: impl Into<String>) -> Self {
        let (width, height) = settings.chart_pixels();
        Self::sized(settings, title.into(), width, height)
    }

    /// Map configuration at the configured map size
    pub fn map(settings: &GraphSettings, title: impl Into<String>) -> Self {
        let (width, height) = settings.map_pixels();
        Self::sized(settings, title.into(), width, height)
    }

    fn sized(settings: &GraphSettings, title: String, width: u32, height: u32) -> Self {
        let style = StyleConfig {
            color_scheme: ColorScheme::Default,
            background_color: Some(settings.background_color.clone()),
            bar_color: settings.bar_color.clone(),
            boundary_color: settings.boundary_color.clone(),
            title_font: FontConfig {
                family: settings.font_family.clone(),
                size: settings.points_to_pixels(settings.title_font_size),
            },
            axis_font: FontConfig {
                family: settings.font_family.clone(),
                size: settings.points_to_pixels(settings.font_size),
            },
            margins: MarginConfig::scaled(height),
            marker_size_divisor: settings.marker_size_divisor,
            marker_alpha: settings.marker_alpha,
            grid_alpha: settings.grid_alpha,
        };

        Self {
            title,
            width,
            height,
            dpi: settings.dpi,
            x_label: None,
            y_label: None,
            style,
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.style.color_scheme = scheme;
        self
    }
}
