//! Graph manager for rendering every static chart and map of a run.

use crate::{
    route_title, wrapped_route_title, BoundarySet, ColorScheme, CountryMapData, CountryMapRenderer, CountryTotalsChart,
    CountryYearStackedChart, GraphConfig, GraphRenderer, InteractiveMap, YearlyTotalsChart,
};
use medarrivals_common::{CountrySpec, Result};
use medarrivals_config::{Config, GraphSettings};
use medarrivals_data::{Aggregates, ArrivalTable};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const COUNTRY_CHART_FILE: &str = "plot_country.png";
pub const YEAR_CHART_FILE: &str = "plot_year.png";
pub const COUNTRY_YEAR_CHART_FILE: &str = "plot_country_year.png";

/// File name of a country's map, e.g. `plot_Italy.png`
pub fn map_file_name(country_name: &str) -> String {
    format!("plot_{}.png", country_name)
}

/// Renders charts and maps into the output directory.
pub struct GraphManager {
    settings: GraphSettings,
    output_dir: PathBuf,
    start_year: i32,
    end_year: i32,
}

impl GraphManager {
    pub fn new(settings: GraphSettings, output_dir: impl Into<PathBuf>, start_year: i32, end_year: i32) -> Self {
        Self {
            settings,
            output_dir: output_dir.into(),
            start_year,
            end_year,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.graph.clone(),
            config.output.dir.clone(),
            config.query.start_year,
            config.query.end_year,
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn title(&self, suffix: &str) -> String {
        route_title(self.start_year, self.end_year, suffix)
    }

    /// Bar chart titles break onto a second line before the year range
    fn chart_title(&self, suffix: &str) -> String {
        wrapped_route_title(self.start_year, self.end_year, suffix)
    }

    /// Render the three bar charts. Nothing is written when there is no data.
    pub async fn render_charts(&self, aggregates: &Aggregates) -> Result<Vec<PathBuf>> {
        if aggregates.country.is_empty() {
            warn!("No arrivals to chart, skipping bar charts");
            return Ok(Vec::new());
        }

        let mut written = Vec::with_capacity(3);

        let path = self.output_dir.join(COUNTRY_CHART_FILE);
        let config = GraphConfig::bar_chart(&self.settings, self.chart_title("by arrival country"))
            .with_labels("Individuals", "Arrival country");
        CountryTotalsChart::new()
            .render_to_file(&config, &aggregates.country, &path)
            .await?;
        written.push(path);

        let path = self.output_dir.join(YEAR_CHART_FILE);
        let config = GraphConfig::bar_chart(&self.settings, self.chart_title("by year")).with_labels("Year", "Individuals");
        YearlyTotalsChart::new()
            .render_to_file(&config, &aggregates.year, &path)
            .await?;
        written.push(path);

        let path = self.output_dir.join(COUNTRY_YEAR_CHART_FILE);
        let config = GraphConfig::bar_chart(&self.settings, self.chart_title("by year"))
            .with_labels("Year", "Individuals")
            .with_color_scheme(ColorScheme::Viridis);
        CountryYearStackedChart::new()
            .render_to_file(&config, &aggregates.pivot(), &path)
            .await?;
        written.push(path);

        info!(count = written.len(), "Rendered bar charts");
        Ok(written)
    }

    /// Render one map per country. Countries with neither boundary nor
    /// observations are skipped.
    pub async fn render_maps(
        &self,
        table: &ArrivalTable,
        countries: &[CountrySpec],
        boundaries: &BoundarySet,
    ) -> Result<Vec<PathBuf>> {
        let renderer = CountryMapRenderer::new();
        let mut written = Vec::with_capacity(countries.len());

        for country in countries {
            let data = CountryMapData::from_table(table, country, boundaries);
            if data.bounds().is_none() {
                warn!(country = %country.name, "Nothing to draw, skipping map");
                continue;
            }

            let path = self.output_dir.join(map_file_name(&country.name));
            let config = GraphConfig::map(&self.settings, self.title(&format!("in {}", country.name)))
                .with_color_scheme(ColorScheme::Blues);
            renderer.render_to_file(&config, &data, &path).await?;
            written.push(path);
        }

        info!(count = written.len(), "Rendered country maps");
        Ok(written)
    }

    /// The animated map for this run's year range
    pub fn interactive_map(&self, plotly_js_url: &str) -> InteractiveMap {
        InteractiveMap::new(self.title("by destination and by year"), plotly_js_url)
    }
}
