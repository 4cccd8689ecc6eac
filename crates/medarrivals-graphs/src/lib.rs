//! # medarrivals graphs
//!
//! Static charts and maps rendered with plotters, plus the animated
//! Plotly map opened in the browser.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod boundaries;
pub mod interactive;
pub mod legend;
pub mod manager;
pub mod renderer;
pub mod types;
pub mod utils;

// Renderers
pub mod country_map;
pub mod country_totals;
pub mod country_year_stacked;
pub mod yearly_totals;

pub use boundaries::{boundary_bounds, BoundarySet};
pub use country_map::{CountryMapData, CountryMapRenderer, MapExtent, MapPoint};
pub use country_totals::CountryTotalsChart;
pub use country_year_stacked::CountryYearStackedChart;
pub use interactive::InteractiveMap;
pub use manager::{map_file_name, GraphManager, COUNTRY_CHART_FILE, COUNTRY_YEAR_CHART_FILE, YEAR_CHART_FILE};
pub use renderer::GraphRenderer;
pub use types::{ColorScheme, FontConfig, GraphConfig, MarginConfig, StyleConfig};
pub use utils::*;
pub use yearly_totals::YearlyTotalsChart;
