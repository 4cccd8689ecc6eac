//! The end-to-end run: fetch, normalize, aggregate, export, draw

use crate::browser;
use medarrivals_common::Result;
use medarrivals_config::Config;
use medarrivals_data::{Aggregates, ArrivalCollector, ArrivalTable, CsvExporter, ExportedFiles, SublocationSource};
use medarrivals_graphs::{BoundarySet, GraphManager};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Switches that come from the command line rather than the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_maps: bool,
}

/// What a run wrote to disk
#[derive(Debug)]
pub struct RunSummary {
    pub rows: usize,
    pub exported: ExportedFiles,
    pub charts: Vec<PathBuf>,
    pub maps: Vec<PathBuf>,
    pub interactive: Option<PathBuf>,
}

pub struct Pipeline<S> {
    config: Config,
    source: S,
    options: RunOptions,
}

impl<S: SublocationSource> Pipeline<S> {
    pub fn new(config: Config, source: S, options: RunOptions) -> Self {
        Self {
            config,
            source,
            options,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Query every (country, year) pair and build the validated table
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Result<ArrivalTable> {
        let query = &self.config.query;
        let collector = ArrivalCollector::new(&self.source, query.countries.clone(), query.start_year, query.end_year);
        let records = collector.collect().await?;
        let table = ArrivalTable::from_records(records, collector.countries(), query.years())?;
        info!(
            rows = table.len(),
            individuals = table.total_individuals(),
            "Built arrivals table"
        );
        Ok(table)
    }

    /// Write `data.csv` and the three aggregate files into the existing output directory
    pub fn export(&self, table: &ArrivalTable, aggregates: &Aggregates) -> Result<ExportedFiles> {
        let files = CsvExporter::new(&self.config.output.dir)?.export_all(table, aggregates)?;
        info!("Exported CSV files to {}", self.config.output.dir.display());
        Ok(files)
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let table = self.collect().await?;
        let aggregates = Aggregates::compute(table.rows());
        let exported = self.export(&table, &aggregates)?;

        let graphs = GraphManager::from_config(&self.config);
        let charts = graphs.render_charts(&aggregates).await?;

        let maps = if self.options.skip_maps {
            info!("Skipping country maps");
            Vec::new()
        } else {
            let boundaries =
                BoundarySet::load(&self.config.boundaries.source, &self.config.boundaries.name_property).await?;
            graphs
                .render_maps(&table, &self.config.query.countries, &boundaries)
                .await?
        };

        let interactive = if self.config.interactive.enabled {
            let page = graphs
                .interactive_map(&self.config.interactive.plotly_js_url)
                .write_temp(&table)?;
            if self.config.interactive.open_browser {
                if let Err(e) = browser::open(&page) {
                    warn!("Could not open a browser: {}; the map is at {}", e, page.display());
                }
            }
            Some(page)
        } else {
            None
        };

        info!(
            rows = table.len(),
            charts = charts.len(),
            maps = maps.len(),
            "Run finished"
        );
        Ok(RunSummary {
            rows: table.len(),
            exported,
            charts,
            maps,
            interactive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medarrivals_common::{parse_sublocation_response, CountryTotal, GeoId, SublocationRecord};
    use medarrivals_data::export::read_csv;
    use tempfile::tempdir;

    /// Two sub-locations per request, except Cyprus which reports nothing
    struct FixedSource;

    #[async_trait]
    impl SublocationSource for FixedSource {
        async fn fetch(&self, geo_id: GeoId, year: i32) -> Result<Vec<SublocationRecord>> {
            if geo_id == 616 {
                return Ok(Vec::new());
            }
            let body = format!(
                r#"{{"data": [
                    {{"geomaster_name": "A", "admin_level": "Admin1", "centroid_lon": 1.0, "centroid_lat": 2.0,
                      "date": "{year}-01-31", "year": {year}, "individuals": 10}},
                    {{"geomaster_name": "B", "admin_level": "Admin1", "centroid_lon": 1.5, "centroid_lat": 2.5,
                      "date": "", "year": {year}, "individuals": "5"}}
                ]}}"#,
                year = year
            );
            parse_sublocation_response(&body, geo_id, year)
        }
    }

    fn config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.query.start_year = 2020;
        config.query.end_year = 2021;
        config.output.dir = dir.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_collect_and_export() {
        let dir = tempdir().unwrap();
        let pipeline = Pipeline::new(config(dir.path()), FixedSource, RunOptions::default());

        let table = pipeline.collect().await.unwrap();
        // Italy, Greece, Spain, Malta × 2 years × 2 sub-locations
        assert_eq!(table.len(), 16);
        assert_eq!(table.total_individuals(), 16 / 2 * 15);

        let aggregates = Aggregates::compute(table.rows());
        let files = pipeline.export(&table, &aggregates).unwrap();
        assert_eq!(files.data, dir.path().join("data.csv"));
        assert!(files.iter().all(|path| path.exists()));

        let countries: Vec<CountryTotal> = read_csv(&files.country).unwrap();
        assert_eq!(countries.len(), 4);
        assert!(countries.iter().all(|c| c.individuals == 30));
    }

    #[tokio::test]
    async fn test_missing_output_dir_aborts() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path());
        config.output.dir = dir.path().join("absent");
        let pipeline = Pipeline::new(config, FixedSource, RunOptions::default());

        let table = pipeline.collect().await.unwrap();
        let result = pipeline.export(&table, &Aggregates::compute(table.rows()));
        assert!(matches!(result, Err(medarrivals_common::ArrivalsError::Io(_))));
        assert!(!dir.path().join("absent").exists());
    }

    #[tokio::test]
    #[ignore = "needs system fonts and network access"]
    async fn test_full_run() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path());
        config.interactive.open_browser = false;
        let summary = Pipeline::new(config, FixedSource, RunOptions::default()).run().await.unwrap();
        assert_eq!(summary.charts.len(), 3);
        assert!(summary.interactive.is_some());
    }
}
