//! medarrivals - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use medarrivals::{Args, Pipeline, RunOptions};
use medarrivals_common::{init_logging, LoggingConfig, UnhcrClient};
use medarrivals_config::ConfigLoader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    init_logging(LoggingConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Collecting Mediterranean arrivals from {} to {}",
        config.query.start_year, config.query.end_year
    );

    let client = UnhcrClient::new(config.source.client_config()).context("Failed to build the UNHCR client")?;
    let options = RunOptions {
        skip_maps: args.skip_maps,
    };
    let summary = Pipeline::new(config, client, options)
        .run()
        .await
        .context("Run failed")?;

    info!(
        "Wrote {} rows, {} charts and {} maps",
        summary.rows,
        summary.charts.len(),
        summary.maps.len()
    );
    if let Some(page) = summary.interactive {
        info!("Interactive map: {}", page.display());
    }

    Ok(())
}
