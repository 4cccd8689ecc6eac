//! UNHCR operational data portal client
//!
//! One unauthenticated GET per (geo_id, year) against the `sublocation`
//! population endpoint. No retry and no rate limiting: a failed request
//! aborts the run.

use crate::error::{ArrivalsError, Result};
use crate::types::GeoId;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Default sublocation endpoint
pub const DEFAULT_BASE_URL: &str = "https://data.unhcr.org/population/get/sublocation";
/// Situation view id for the Mediterranean situation
pub const DEFAULT_SV_ID: u32 = 11;
/// Population group for sea arrivals
pub const DEFAULT_POPULATION_GROUP: u32 = 4797;

/// Configuration for the UNHCR client
#[derive(Debug, Clone)]
pub struct UnhcrConfig {
    /// Endpoint URL, without query string
    pub base_url: String,
    /// `sv_id` query parameter
    pub sv_id: u32,
    /// `population_group` query parameter
    pub population_group: u32,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for UnhcrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sv_id: DEFAULT_SV_ID,
            population_group: DEFAULT_POPULATION_GROUP,
            timeout_secs: None,
        }
    }
}

impl UnhcrConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Override the constant query parameters
    pub fn with_query(mut self, sv_id: u32, population_group: u32) -> Self {
        self.sv_id = sv_id;
        self.population_group = population_group;
        self
    }
}

/// A sublocation record as returned by the portal, before the country join
#[derive(Debug, Clone, PartialEq)]
pub struct SublocationRecord {
    /// The `geo_id` the record was requested for
    pub geo_id: GeoId,
    pub geomaster_name: String,
    pub admin_level: String,
    /// `None` when the portal has no centroid for the sub-location
    pub centroid_lon: Option<f64>,
    pub centroid_lat: Option<f64>,
    /// Raw `date` field, parsed later into `last_update`
    pub date: Option<String>,
    pub month: Option<String>,
    pub year: i32,
    pub population_groups_concat: Option<String>,
    pub individuals: u64,
}

/// Response envelope of the sublocation endpoint
#[derive(Debug, Deserialize)]
struct SublocationResponse {
    data: Vec<Map<String, Value>>,
}

/// HTTP client for the sublocation endpoint
#[derive(Debug, Clone)]
pub struct UnhcrClient {
    client: Client,
    base_url: Url,
    config: UnhcrConfig,
}

impl UnhcrClient {
    /// Create a new client with the given configuration
    pub fn new(config: UnhcrConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ArrivalsError::config_with_source(format!("Invalid UNHCR base URL '{}'", config.base_url), e)
        })?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| ArrivalsError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Create a client against the public portal
    pub fn with_defaults() -> Result<Self> {
        Self::new(UnhcrConfig::default())
    }

    /// Build the request URL for one (geo_id, year) pair
    pub fn build_url(&self, geo_id: GeoId, year: i32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("geo_id", &geo_id.to_string())
            .append_pair("year", &year.to_string())
            .append_pair("sv_id", &self.config.sv_id.to_string())
            .append_pair("population_group", &self.config.population_group.to_string());
        url
    }

    /// Fetch all sublocation records for one country and year
    #[instrument(skip(self))]
    pub async fn fetch_sublocations(&self, geo_id: GeoId, year: i32) -> Result<Vec<SublocationRecord>> {
        let url = self.build_url(geo_id, year);
        debug!("Requesting {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArrivalsError::source_with_status(
                format!("sublocation request for geo_id={} year={} returned {}", geo_id, year, status),
                status.as_u16(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ArrivalsError::network_with_source("Failed to read response body", e))?;

        let records = parse_sublocation_response(&body, geo_id, year)?;
        info!(records = records.len(), "Fetched sublocations");
        Ok(records)
    }
}

/// Parse a sublocation response body.
///
/// Returns an empty vector when no record carries an `individuals` field.
/// Once any record has it, every record must have a count that coerces to a
/// non-negative integer.
pub fn parse_sublocation_response(body: &str, geo_id: GeoId, year: i32) -> Result<Vec<SublocationRecord>> {
    let response: SublocationResponse = serde_json::from_str(body)?;

    if !response.data.iter().any(|row| row.contains_key("individuals")) {
        debug!(geo_id, year, "No individuals reported, skipping");
        return Ok(Vec::new());
    }

    response
        .data
        .iter()
        .map(|row| parse_record(row, geo_id, year))
        .collect()
}

fn parse_record(row: &Map<String, Value>, geo_id: GeoId, requested_year: i32) -> Result<SublocationRecord> {
    let individuals = match row.get("individuals") {
        Some(value) => coerce_count(value, "individuals")?,
        None => {
            return Err(ArrivalsError::validation_field(
                "record without individuals in a response that reports them",
                "individuals",
            ))
        }
    };

    let year = match row.get("year") {
        Some(value) if !value.is_null() => coerce_year(value)?,
        _ => requested_year,
    };

    Ok(SublocationRecord {
        geo_id,
        geomaster_name: text_field(row, "geomaster_name").unwrap_or_default(),
        admin_level: text_field(row, "admin_level").unwrap_or_default(),
        centroid_lon: coerce_float(row.get("centroid_lon"), "centroid_lon")?,
        centroid_lat: coerce_float(row.get("centroid_lat"), "centroid_lat")?,
        date: text_field(row, "date"),
        month: text_field(row, "month"),
        year,
        population_groups_concat: text_field(row, "population_groups_concat"),
        individuals,
    })
}

/// Render a scalar JSON value as text; null and absent become `None`
fn text_field(row: &Map<String, Value>, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Null, absent and blank values are missing, not malformed
fn coerce_float(value: Option<&Value>, field: &str) -> Result<Option<f64>> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed.map(Some).ok_or_else(|| {
        ArrivalsError::validation_field(format!("{} is not numeric: {:?}", field, value), field)
    })
}

fn coerce_count(value: &Value, field: &str) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ArrivalsError::validation_field(
            format!("{} is not a non-negative integer: {}", field, value),
            field,
        )
    })
}

fn coerce_year(value: &Value) -> Result<i32> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ArrivalsError::validation_field(format!("year is not an integer: {}", value), "year")
    })
}
