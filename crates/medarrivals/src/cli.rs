//! Command line arguments

use clap::Parser;
use medarrivals_config::Config;
use std::path::PathBuf;

/// Mediterranean sea arrivals: fetch UNHCR data, write CSV files, draw charts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Output directory for CSV files and images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write the interactive map without opening a browser
    #[arg(long)]
    pub no_browser: bool,

    /// Skip the per-country maps
    #[arg(long)]
    pub skip_maps: bool,
}

impl Args {
    /// Command line values take precedence over file and environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.no_browser {
            config.interactive.open_browser = false;
        }
    }
}
