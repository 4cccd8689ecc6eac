//! Common types used across the arrivals pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric country identifier used by the UNHCR portal
pub type GeoId = u32;

/// A country whose arrivals are queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySpec {
    /// Display name, also used in output file names (`plot_<name>.png`)
    pub name: String,
    /// UNHCR `geo_id`
    pub geo_id: GeoId,
    /// Country whose boundary is drawn behind this country's map.
    /// `None` means the country's own boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

impl CountrySpec {
    pub fn new(name: impl Into<String>, geo_id: GeoId) -> Self {
        Self {
            name: name.into(),
            geo_id,
            boundary: None,
        }
    }

    /// Draw this country's map against another country's boundary
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Name of the boundary feature to draw for this country
    pub fn boundary_name(&self) -> &str {
        self.boundary.as_deref().unwrap_or(&self.name)
    }
}

/// The five Mediterranean arrival countries.
///
/// Malta is absent from the low resolution Natural Earth layer; its map uses
/// Italy's boundary.
pub fn default_countries() -> Vec<CountrySpec> {
    vec![
        CountrySpec::new("Italy", 656),
        CountrySpec::new("Greece", 640),
        CountrySpec::new("Spain", 729),
        CountrySpec::new("Cyprus", 616),
        CountrySpec::new("Malta", 690).with_boundary("Italy"),
    ]
}

/// One arrival observation, i.e. one row of `data.csv`.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalObservation {
    pub geomaster_name: String,
    pub admin_level: String,
    /// Empty cell when the sub-location has no centroid
    pub centroid_lon: Option<f64>,
    pub centroid_lat: Option<f64>,
    pub month: Option<String>,
    pub year: i32,
    pub population_groups_concat: Option<String>,
    pub individuals: u64,
    pub country_name: String,
    pub last_update: Option<NaiveDate>,
}

impl ArrivalObservation {
    /// `(lon, lat)` when both centroid coordinates are known
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.centroid_lon?, self.centroid_lat?))
    }
}

/// Total arrivals for one country in one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryYearTotal {
    pub country_name: String,
    pub year: i32,
    pub individuals: u64,
}

/// Total arrivals in one year, all countries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub individuals: u64,
}

/// Total arrivals in one country, all years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTotal {
    pub country_name: String,
    pub individuals: u64,
}
