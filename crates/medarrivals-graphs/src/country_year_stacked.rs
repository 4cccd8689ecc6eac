//! Stacked bar chart of arrivals per year, one segment per country

use crate::legend::{Legend, LegendCorner, LegendEntry, LegendMarker};
use crate::utils::{count_axis_max, count_label, titled_area, YearAxis};
use crate::{GraphConfig, GraphRenderer};
use async_trait::async_trait;
use medarrivals_common::{ArrivalsError, Result};
use medarrivals_data::CountryYearPivot;
use plotters::prelude::*;
use std::path::Path;

/// Renders `plot_country_year.png`.
///
/// Countries stack bottom-up in alphabetical order, coloured along the
/// configured scheme (viridis for the standard output).
#[derive(Debug, Default)]
pub struct CountryYearStackedChart;

impl CountryYearStackedChart {
    pub fn new() -> Self {
        Self
    }

    /// Bottom and top of every segment, `[country][year]`
    pub fn segments(&self, pivot: &CountryYearPivot) -> Vec<Vec<(u64, u64)>> {
        let mut bottoms = vec![0u64; pivot.years.len()];
        (0..pivot.countries.len())
            .map(|c| {
                pivot
                    .values
                    .iter()
                    .zip(bottoms.iter_mut())
                    .map(|(row, bottom)| {
                        let start = *bottom;
                        *bottom += row[c];
                        (start, *bottom)
                    })
                    .collect()
            })
            .collect()
    }
}

#[async_trait]
impl GraphRenderer for CountryYearStackedChart {
    type Data = CountryYearPivot;

    async fn render_to_file(&self, config: &GraphConfig, data: &CountryYearPivot, path: &Path) -> Result<()> {
        let axis = YearAxis::new(data.years.iter().copied());
        if axis.is_empty() {
            return Err(ArrivalsError::graph("No data available for the stacked country/year chart"));
        }

        let style = &config.style;
        let colors = self.sample_colors(&style.color_scheme, data.countries.len());
        let segments = self.segments(data);

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let plot_area = titled_area(&root, &config.title, &style.title_font)?;
        let axis_font = (style.axis_font.family.as_str(), style.axis_font.size);
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(style.margins.top)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d(axis.range(), 0.0..count_axis_max(data.max_year_total()))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or("Year"))
            .y_desc(config.y_label.as_deref().unwrap_or("Individuals"))
            .label_style(axis_font)
            .axis_desc_style(axis_font)
            .x_labels(axis.len())
            .x_label_formatter(&|x| axis.label(*x))
            .y_label_formatter(&|y| count_label(*y))
            .draw()?;

        for (country_segments, color) in segments.iter().zip(&colors) {
            let fill = color.filled();
            chart.draw_series(data.years.iter().zip(country_segments).filter(|(_, (lo, hi))| hi > lo).filter_map(
                |(year, (lo, hi))| {
                    let center = axis.position(*year)?;
                    Some(Rectangle::new([(center - 0.25, *lo as f64), (center + 0.25, *hi as f64)], fill))
                },
            ))?;
        }

        let legend = Legend {
            title: Some("Arrival country".to_string()),
            entries: data
                .countries
                .iter()
                .zip(&colors)
                .map(|(name, color)| LegendEntry::new(name.clone(), *color))
                .collect(),
            marker: LegendMarker::Square,
            corner: LegendCorner::UpperLeft,
        };
        let origin = legend.origin(&style.axis_font, chart.plotting_area().get_pixel_range());
        legend.draw(&root, &style.axis_font, origin)?;

        root.present()?;
        tracing::info!("Successfully rendered {} to {}", self.name(), path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stacked country/year chart"
    }
}
