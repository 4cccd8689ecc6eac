//! Graph rendering trait and colour handling

use crate::{ColorScheme, GraphConfig};
use async_trait::async_trait;
use medarrivals_common::Result;
use plotters::style::RGBColor;
use std::path::Path;

/// Anchors of the viridis ramp at t = 0, 1/8, ..., 1
const VIRIDIS: [RGBColor; 9] = [
    RGBColor(68, 1, 84),
    RGBColor(71, 44, 122),
    RGBColor(59, 81, 139),
    RGBColor(44, 113, 142),
    RGBColor(33, 145, 140),
    RGBColor(40, 174, 128),
    RGBColor(94, 201, 98),
    RGBColor(173, 220, 48),
    RGBColor(253, 231, 37),
];

/// Anchors of the Blues ramp at t = 0, 1/8, ..., 1
const BLUES: [RGBColor; 9] = [
    RGBColor(247, 251, 255),
    RGBColor(222, 235, 247),
    RGBColor(198, 219, 239),
    RGBColor(158, 202, 225),
    RGBColor(107, 174, 214),
    RGBColor(66, 146, 198),
    RGBColor(33, 113, 181),
    RGBColor(8, 81, 156),
    RGBColor(8, 48, 107),
];

/// Trait for rendering one kind of chart to a PNG file
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// The data this renderer draws
    type Data: ?Sized + Sync;

    /// Render a graph to a file path, overwriting it
    async fn render_to_file(&self, config: &GraphConfig, data: &Self::Data, path: &Path) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
                RGBColor(188, 189, 34),  // Olive
                RGBColor(23, 190, 207),  // Cyan
            ],
            ColorScheme::Viridis => VIRIDIS.to_vec(),
            ColorScheme::Blues => BLUES.to_vec(),
            ColorScheme::Custom(colors) => colors.iter().map(|color_str| self.parse_color(color_str)).collect(),
        }
    }

    /// `n` colours for `n` ordered series.
    ///
    /// Ramps are sampled evenly from end to end; palettes are cycled.
    fn sample_colors(&self, scheme: &ColorScheme, n: usize) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Viridis | ColorScheme::Blues => {
                let anchors = self.get_colors(scheme);
                (0..n)
                    .map(|i| {
                        let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                        interpolate(&anchors, t)
                    })
                    .collect()
            }
            _ => {
                let palette = self.get_colors(scheme);
                if palette.is_empty() {
                    return vec![RGBColor(0, 0, 0); n];
                }
                (0..n).map(|i| palette[i % palette.len()]).collect()
            }
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255)) // Default white
    }
}

/// Linear interpolation along evenly spaced anchors, `t` clamped to [0, 1]
pub fn interpolate(anchors: &[RGBColor], t: f64) -> RGBColor {
    match anchors.len() {
        0 => RGBColor(0, 0, 0),
        1 => anchors[0],
        len => {
            let scaled = t.clamp(0.0, 1.0) * (len - 1) as f64;
            let lower = (scaled.floor() as usize).min(len - 2);
            let frac = scaled - lower as f64;
            let (a, b) = (anchors[lower], anchors[lower + 1]);
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}

/// Position of `value` within `[min, max]`; a degenerate range maps to 1
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockRenderer;

    #[async_trait]
    impl GraphRenderer for MockRenderer {
        type Data = [u64];

        async fn render_to_file(&self, _config: &GraphConfig, _data: &[u64], _path: &Path) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    #[test]
    fn test_color_schemes() {
        let renderer = MockRenderer;

        let default_colors = renderer.get_colors(&ColorScheme::Default);
        assert_eq!(default_colors.len(), 10);
        assert_eq!(default_colors[0], RGBColor(31, 119, 180));

        let custom = ColorScheme::Custom(vec!["#FF0000".to_string(), "#00FF00".to_string()]);
        assert_eq!(
            renderer.get_colors(&custom),
            vec![RGBColor(255, 0, 0), RGBColor(0, 255, 0)]
        );
    }

    #[test]
    fn test_color_parsing() {
        let renderer = MockRenderer;
        assert_eq!(renderer.parse_color("#D3D3D3"), RGBColor(211, 211, 211));
        assert_eq!(renderer.parse_color("#1f77b4"), RGBColor(31, 119, 180));

        // Invalid colors default to black
        assert_eq!(renderer.parse_color("lightgrey"), RGBColor(0, 0, 0));
        assert_eq!(renderer.parse_color("#ZZ0000"), RGBColor(0, 0, 0));
        assert_eq!(renderer.parse_color("#ééé"), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_ramp_sampling_hits_both_ends() {
        let renderer = MockRenderer;
        let colors = renderer.sample_colors(&ColorScheme::Viridis, 5);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], RGBColor(68, 1, 84));
        assert_eq!(colors[2], RGBColor(33, 145, 140));
        assert_eq!(colors[4], RGBColor(253, 231, 37));

        let single = renderer.sample_colors(&ColorScheme::Blues, 1);
        assert_eq!(single, vec![RGBColor(247, 251, 255)]);
        assert!(renderer.sample_colors(&ColorScheme::Blues, 0).is_empty());
    }

    #[test]
    fn test_palette_sampling_cycles() {
        let renderer = MockRenderer;
        let colors = renderer.sample_colors(&ColorScheme::Default, 12);
        assert_eq!(colors[10], colors[0]);
        assert_eq!(
            renderer.sample_colors(&ColorScheme::Custom(Vec::new()), 2),
            vec![RGBColor(0, 0, 0); 2]
        );
    }

    #[test]
    fn test_interpolate() {
        let anchors = [RGBColor(0, 0, 0), RGBColor(200, 100, 50)];
        assert_eq!(interpolate(&anchors, 0.5), RGBColor(100, 50, 25));
        assert_eq!(interpolate(&anchors, -1.0), RGBColor(0, 0, 0));
        assert_eq!(interpolate(&anchors, 2.0), RGBColor(200, 100, 50));
        assert_eq!(interpolate(&[], 0.3), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(2018.0, 2014.0, 2022.0), 0.5);
        assert_eq!(normalize(2014.0, 2014.0, 2014.0), 1.0);
    }

    #[test]
    fn test_background_color() {
        let renderer = MockRenderer;
        let mut config = GraphConfig::default();
        assert_eq!(renderer.get_background_color(&config), RGBColor(255, 255, 255));

        config.style.background_color = None;
        assert_eq!(renderer.get_background_color(&config), RGBColor(255, 255, 255));

        config.style.background_color = Some("#000000".to_string());
        assert_eq!(renderer.get_background_color(&config), RGBColor(0, 0, 0));
    }
}
