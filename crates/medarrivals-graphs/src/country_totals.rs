//! Horizontal bar chart of total arrivals per country

use crate::utils::{count_axis_max, count_label, titled_area};
use crate::{GraphConfig, GraphRenderer};
use async_trait::async_trait;
use medarrivals_common::{ArrivalsError, CountryTotal, Result};
use plotters::prelude::*;
use std::path::Path;

/// Renders `plot_country.png`: one bar per country, smallest at the bottom
#[derive(Debug, Default)]
pub struct CountryTotalsChart;

impl CountryTotalsChart {
    pub fn new() -> Self {
        Self
    }

    /// Bars in drawing order: ascending by total, ties kept in name order
    pub fn ordered<'a>(&self, totals: &'a [CountryTotal]) -> Vec<&'a CountryTotal> {
        let mut bars: Vec<&CountryTotal> = totals.iter().collect();
        bars.sort_by_key(|total| total.individuals);
        bars
    }
}

#[async_trait]
impl GraphRenderer for CountryTotalsChart {
    type Data = [CountryTotal];

    async fn render_to_file(&self, config: &GraphConfig, data: &[CountryTotal], path: &Path) -> Result<()> {
        if data.is_empty() {
            return Err(ArrivalsError::graph("No data available for the country totals chart"));
        }

        let bars = self.ordered(data);
        let names: Vec<&str> = bars.iter().map(|b| b.country_name.as_str()).collect();
        let max = bars.iter().map(|b| b.individuals).max().unwrap_or(0);
        let n = bars.len();

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let style = &config.style;
        let plot_area = titled_area(&root, &config.title, &style.title_font)?;
        let axis_font = (style.axis_font.family.as_str(), style.axis_font.size);
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(style.margins.top)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d(0.0..count_axis_max(max), -0.5..(n as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or("Individuals"))
            .y_desc(config.y_label.as_deref().unwrap_or("Arrival country"))
            .label_style(axis_font)
            .axis_desc_style(axis_font)
            .y_labels(n)
            .y_label_formatter(&|y| {
                let index = y.round();
                if (y - index).abs() < 1e-6 && index >= 0.0 {
                    names.get(index as usize).map(|name| name.to_string()).unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .x_label_formatter(&|x| count_label(*x))
            .draw()?;

        let fill = self.parse_color(&style.bar_color).filled();
        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let center = i as f64;
            Rectangle::new([(0.0, center - 0.25), (bar.individuals as f64, center + 0.25)], fill)
        }))?;

        root.present()?;
        tracing::info!("Successfully rendered {} to {}", self.name(), path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "country totals chart"
    }
}
