//! The normalized observation table

use medarrivals_common::{
    parse_update_date, ArrivalObservation, ArrivalsError, CountrySpec, GeoId, Result, SublocationRecord,
};
use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// All observations of a run, in collection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrivalTable {
    rows: Vec<ArrivalObservation>,
}

impl ArrivalTable {
    /// Join country names onto raw records and coerce their fields.
    ///
    /// Records whose `geo_id` is not a configured country are dropped. Every
    /// remaining year must fall inside `years`.
    pub fn from_records(
        records: Vec<SublocationRecord>,
        countries: &[CountrySpec],
        years: RangeInclusive<i32>,
    ) -> Result<Self> {
        let names: HashMap<GeoId, &str> = countries.iter().map(|c| (c.geo_id, c.name.as_str())).collect();

        let total = records.len();
        let mut rows = Vec::with_capacity(total);
        for record in records {
            let Some(country_name) = names.get(&record.geo_id) else {
                debug!(geo_id = record.geo_id, "Dropping record for unknown geo_id");
                continue;
            };

            if !years.contains(&record.year) {
                return Err(ArrivalsError::validation_field(
                    format!(
                        "{} reported year {} outside {}..={}",
                        country_name,
                        record.year,
                        years.start(),
                        years.end()
                    ),
                    "year",
                ));
            }

            let last_update = match record.date.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(parse_update_date(raw)?),
                _ => None,
            };

            rows.push(ArrivalObservation {
                geomaster_name: record.geomaster_name,
                admin_level: record.admin_level,
                centroid_lon: record.centroid_lon,
                centroid_lat: record.centroid_lat,
                month: record.month,
                year: record.year,
                population_groups_concat: record.population_groups_concat,
                individuals: record.individuals,
                country_name: (*country_name).to_string(),
                last_update,
            });
        }

        if rows.len() < total {
            warn!(dropped = total - rows.len(), "Records without a configured country were dropped");
        }
        info!(rows = rows.len(), "Built arrival table");

        Ok(Self { rows })
    }

    /// Wrap already normalized rows
    pub fn from_rows(rows: Vec<ArrivalObservation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ArrivalObservation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of `individuals` over every row
    pub fn total_individuals(&self) -> u64 {
        self.rows.iter().map(|row| row.individuals).sum()
    }

    /// Rows of one country, in table order
    pub fn country_rows<'a>(&'a self, country_name: &'a str) -> impl Iterator<Item = &'a ArrivalObservation> + 'a {
        self.rows.iter().filter(move |row| row.country_name == country_name)
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> BTreeSet<i32> {
        self.rows.iter().map(|row| row.year).collect()
    }
}
