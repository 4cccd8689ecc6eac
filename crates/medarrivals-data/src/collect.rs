//! Sequential collection of sublocation records

use async_trait::async_trait;
use medarrivals_common::{CountrySpec, GeoId, Result, SublocationRecord, UnhcrClient};
use tracing::{debug, info, instrument};

/// Anything that can return the sublocation records of one country and year
#[async_trait]
pub trait SublocationSource: Send + Sync {
    async fn fetch(&self, geo_id: GeoId, year: i32) -> Result<Vec<SublocationRecord>>;
}

#[async_trait]
impl SublocationSource for UnhcrClient {
    async fn fetch(&self, geo_id: GeoId, year: i32) -> Result<Vec<SublocationRecord>> {
        self.fetch_sublocations(geo_id, year).await
    }
}

#[async_trait]
impl<T: SublocationSource + ?Sized> SublocationSource for &T {
    async fn fetch(&self, geo_id: GeoId, year: i32) -> Result<Vec<SublocationRecord>> {
        (**self).fetch(geo_id, year).await
    }
}

/// Ordered (country, year) pairs: countries outer, years inner.
///
/// An inverted range yields no pairs.
pub fn query_plan(countries: &[CountrySpec], start_year: i32, end_year: i32) -> Vec<(&CountrySpec, i32)> {
    countries
        .iter()
        .flat_map(|country| (start_year..=end_year).map(move |year| (country, year)))
        .collect()
}

/// Walks the query plan one request at a time
pub struct ArrivalCollector<S> {
    source: S,
    countries: Vec<CountrySpec>,
    start_year: i32,
    end_year: i32,
}

impl<S: SublocationSource> ArrivalCollector<S> {
    pub fn new(source: S, countries: Vec<CountrySpec>, start_year: i32, end_year: i32) -> Self {
        Self {
            source,
            countries,
            start_year,
            end_year,
        }
    }

    pub fn countries(&self) -> &[CountrySpec] {
        &self.countries
    }

    /// Fetch every pair of the plan, each request awaited before the next.
    ///
    /// Rows are concatenated in plan order. The first failure aborts.
    #[instrument(skip(self), fields(countries = self.countries.len()))]
    pub async fn collect(&self) -> Result<Vec<SublocationRecord>> {
        let plan = query_plan(&self.countries, self.start_year, self.end_year);
        info!(
            requests = plan.len(),
            "Collecting arrivals for {} to {}", self.start_year, self.end_year
        );

        let mut records = Vec::new();
        let mut empty = 0usize;
        for (country, year) in plan {
            let batch = self.source.fetch(country.geo_id, year).await?;
            if batch.is_empty() {
                empty += 1;
            }
            debug!(country = %country.name, year, rows = batch.len(), "Collected");
            records.extend(batch);
        }

        info!(rows = records.len(), empty_requests = empty, "Collection finished");
        Ok(records)
    }
}
