//! Arrival statistics: collection, normalization, aggregation and export
//!
//! Data flows strictly in one direction:
//! [`ArrivalCollector`] gathers raw sublocation records, [`ArrivalTable`]
//! joins and validates them, [`Aggregates`] sums them, and [`CsvExporter`]
//! writes everything to disk.

pub mod aggregate;
pub mod collect;
pub mod export;
pub mod table;

pub use aggregate::{by_country, by_country_year, by_year, pivot_country_year, Aggregates, CountryYearPivot};
pub use collect::{query_plan, ArrivalCollector, SublocationSource};
pub use export::{CsvExporter, ExportedFiles};
pub use table::ArrivalTable;
