//! Vertical bar chart of total arrivals per year

use crate::utils::{count_axis_max, count_label, titled_area, YearAxis};
use crate::{GraphConfig, GraphRenderer};
use async_trait::async_trait;
use medarrivals_common::{ArrivalsError, Result, YearTotal};
use plotters::prelude::*;
use std::path::Path;

/// Renders `plot_year.png`
#[derive(Debug, Default)]
pub struct YearlyTotalsChart;

impl YearlyTotalsChart {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GraphRenderer for YearlyTotalsChart {
    type Data = [YearTotal];

    async fn render_to_file(&self, config: &GraphConfig, data: &[YearTotal], path: &Path) -> Result<()> {
        let axis = YearAxis::new(data.iter().map(|t| t.year));
        if axis.is_empty() {
            return Err(ArrivalsError::graph("No data available for the yearly totals chart"));
        }
        let max = data.iter().map(|t| t.individuals).max().unwrap_or(0);

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let style = &config.style;
        let plot_area = titled_area(&root, &config.title, &style.title_font)?;
        let axis_font = (style.axis_font.family.as_str(), style.axis_font.size);
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(style.margins.top)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d(axis.range(), 0.0..count_axis_max(max))?;

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

        let fill = self.parse_color(&style.bar_color).filled();
        chart.draw_series(data.iter().filter_map(|total| {
            let center = axis.position(total.year)?;
            Some(Rectangle::new([(center - 0.25, 0.0), (center + 0.25, total.individuals as f64)], fill))
        }))?;

        root.present()?;
        tracing::info!("Successfully rendered {} to {}", self.name(), path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "yearly totals chart"
    }
}
