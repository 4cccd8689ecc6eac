//! Per-country scatter map of sub-location arrivals
//!
//! The country boundary is filled underneath; each observation becomes a
//! translucent circle whose area follows `individuals` and whose colour
//! follows the year.

use crate::boundaries::{boundary_bounds, BoundarySet};
use crate::legend::{Legend, LegendCorner, LegendEntry, LegendMarker};
use crate::renderer::{interpolate, normalize};
use crate::utils::marker_radius_px;
use crate::{ColorScheme, GraphConfig, GraphRenderer};
use async_trait::async_trait;
use geo::MultiPolygon;
use medarrivals_common::{ArrivalsError, CountrySpec, Result};
use medarrivals_data::ArrivalTable;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// One circle on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub lon: f64,
    pub lat: f64,
    pub year: i32,
    pub individuals: u64,
}

/// Everything drawn on one country's map
#[derive(Debug, Clone)]
pub struct CountryMapData {
    pub country_name: String,
    pub boundary: Option<MultiPolygon<f64>>,
    pub points: Vec<MapPoint>,
}

impl CountryMapData {
    /// Select a country's observations and its (possibly substituted) boundary
    pub fn from_table(table: &ArrivalTable, country: &CountrySpec, boundaries: &BoundarySet) -> Self {
        let boundary = boundaries.get(country.boundary_name()).cloned();
        if boundary.is_none() {
            warn!(
                country = %country.name,
                boundary = %country.boundary_name(),
                "No boundary found, drawing observations only"
            );
        }

        let mut points = Vec::new();
        let mut unlocated = 0;
        for row in table.country_rows(&country.name) {
            match row.position() {
                Some((lon, lat)) => points.push(MapPoint {
                    lon,
                    lat,
                    year: row.year,
                    individuals: row.individuals,
                }),
                None => unlocated += 1,
            }
        }
        if unlocated > 0 {
            debug!(country = %country.name, unlocated, "Observations without a centroid are not drawn");
        }

        Self {
            country_name: country.name.clone(),
            boundary,
            points,
        }
    }

    /// Geographic extent of boundary and points, or `None` when both are empty
    pub fn bounds(&self) -> Option<MapExtent> {
        let mut extent: Option<MapExtent> = self.boundary.as_ref().and_then(boundary_bounds).map(|rect| MapExtent {
            min_lon: rect.min().x,
            max_lon: rect.max().x,
            min_lat: rect.min().y,
            max_lat: rect.max().y,
        });
        for point in &self.points {
            extent = Some(match extent {
                Some(e) => e.include(point.lon, point.lat),
                None => MapExtent {
                    min_lon: point.lon,
                    max_lon: point.lon,
                    min_lat: point.lat,
                    max_lat: point.lat,
                },
            });
        }
        extent
    }
}

/// Longitude/latitude window of a map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl MapExtent {
    fn include(self, lon: f64, lat: f64) -> Self {
        Self {
            min_lon: self.min_lon.min(lon),
            max_lon: self.max_lon.max(lon),
            min_lat: self.min_lat.min(lat),
            max_lat: self.max_lat.max(lat),
        }
    }

    /// Grow by `fraction` of the span on every side (at least 0.1°)
    pub fn padded(self, fraction: f64) -> Self {
        let dx = ((self.max_lon - self.min_lon) * fraction).max(0.1);
        let dy = ((self.max_lat - self.min_lat) * fraction).max(0.1);
        Self {
            min_lon: self.min_lon - dx,
            max_lon: self.max_lon + dx,
            min_lat: self.min_lat - dy,
            max_lat: self.max_lat + dy,
        }
    }

    /// Widen the short side so one degree of latitude spans `1 / cos(lat)`
    /// degrees of longitude on a `width` × `height` canvas
    pub fn fit_aspect(self, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return self;
        }
        let mid_lat = (self.min_lat + self.max_lat) / 2.0;
        let stretch = 1.0 / mid_lat.to_radians().cos().max(0.1);
        let canvas = width as f64 / height as f64;

        let dx = self.max_lon - self.min_lon;
        let dy = self.max_lat - self.min_lat;
        let current = dx / (dy * stretch);

        if current < canvas {
            let grow = (canvas * dy * stretch - dx) / 2.0;
            Self {
                min_lon: self.min_lon - grow,
                max_lon: self.max_lon + grow,
                ..self
            }
        } else {
            let grow = (dx / (canvas * stretch) - dy) / 2.0;
            Self {
                min_lat: self.min_lat - grow,
                max_lat: self.max_lat + grow,
                ..self
            }
        }
    }
}

/// Renders `plot_<Country>.png`
#[derive(Debug, Default)]
pub struct CountryMapRenderer;

impl CountryMapRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Colour of each year present, on the configured ramp
    pub fn year_colors(&self, config: &GraphConfig, data: &CountryMapData) -> BTreeMap<i32, RGBColor> {
        let years: Vec<i32> = data.points.iter().map(|p| p.year).collect();
        let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) else {
            return BTreeMap::new();
        };
        let scheme = match &config.style.color_scheme {
            ColorScheme::Default => ColorScheme::Blues,
            other => other.clone(),
        };
        let anchors = self.get_colors(&scheme);
        years
            .into_iter()
            .map(|year| (year, interpolate(&anchors, normalize(year as f64, min as f64, max as f64))))
            .collect()
    }
}

#[async_trait]
impl GraphRenderer for CountryMapRenderer {
    type Data = CountryMapData;

    async fn render_to_file(&self, config: &GraphConfig, data: &CountryMapData, path: &Path) -> Result<()> {
        let Some(bounds) = data.bounds() else {
            return Err(ArrivalsError::graph(format!(
                "Nothing to draw on the {} map",
                data.country_name
            )));
        };
        let extent = bounds.padded(0.05).fit_aspect(config.width, config.height);

        let style = &config.style;
        let year_colors = self.year_colors(config, data);

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let title_font = (style.title_font.family.as_str(), style.title_font.size);
        let axis_font = (style.axis_font.family.as_str(), style.axis_font.size);
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(style.margins.top)
            .x_label_area_size(style.margins.bottom / 2)
            .y_label_area_size(style.margins.left / 2)
            .build_cartesian_2d(extent.min_lon..extent.max_lon, extent.min_lat..extent.max_lat)?;

        chart
            .configure_mesh()
            .bold_line_style(RGBColor(176, 176, 176).mix(style.grid_alpha).stroke_width(1))
            .light_line_style(WHITE.mix(0.0).stroke_width(0))
            .x_desc("")
            .y_desc("")
            .label_style(axis_font)
            .x_label_formatter(&|x| format!("{:.1}", x))
            .y_label_formatter(&|y| format!("{:.1}", y))
            .draw()?;

        if let Some(boundary) = &data.boundary {
            let fill = self.parse_color(&style.boundary_color).filled();
            chart.draw_series(boundary.0.iter().map(|polygon| {
                let ring: Vec<(f64, f64)> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
                Polygon::new(ring, fill)
            }))?;
        }

        // Oldest year first so recent circles sit on top
        for (year, color) in &year_colors {
            let fill = color.mix(style.marker_alpha).filled();
            chart.draw_series(data.points.iter().filter(|p| p.year == *year).map(|point| {
                let radius = marker_radius_px(point.individuals, style.marker_size_divisor, config.dpi);
                Circle::new((point.lon, point.lat), radius, fill)
            }))?;
        }

        let legend = Legend {
            title: Some("Year".to_string()),
            entries: year_colors
                .iter()
                .map(|(year, color)| LegendEntry::new(year.to_string(), *color).with_opacity(style.marker_alpha))
                .collect(),
            marker: LegendMarker::Circle,
            corner: LegendCorner::UpperRight,
        };
        let origin = legend.origin(&style.axis_font, chart.plotting_area().get_pixel_range());
        legend.draw(&root, &style.axis_font, origin)?;

        root.present()?;
        tracing::info!("Successfully rendered {} map to {}", data.country_name, path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "country map"
    }
}
