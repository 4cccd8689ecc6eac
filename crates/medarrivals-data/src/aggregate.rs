//! Group-by sums over the observation table
//!
//! Every function here is pure. Output is sorted by the grouping keys, so
//! identical input always produces identical output.

use medarrivals_common::{ArrivalObservation, CountryTotal, CountryYearTotal, YearTotal};
use std::collections::{BTreeMap, BTreeSet};

/// Totals per (country, year), sorted by country then year
pub fn by_country_year(rows: &[ArrivalObservation]) -> Vec<CountryYearTotal> {
    let mut sums: BTreeMap<(&str, i32), u64> = BTreeMap::new();
    for row in rows {
        *sums.entry((row.country_name.as_str(), row.year)).or_default() += row.individuals;
    }
    sums.into_iter()
        .map(|((country_name, year), individuals)| CountryYearTotal {
            country_name: country_name.to_string(),
            year,
            individuals,
        })
        .collect()
}

/// Totals per year, sorted by year
pub fn by_year(rows: &[ArrivalObservation]) -> Vec<YearTotal> {
    let mut sums: BTreeMap<i32, u64> = BTreeMap::new();
    for row in rows {
        *sums.entry(row.year).or_default() += row.individuals;
    }
    sums.into_iter()
        .map(|(year, individuals)| YearTotal { year, individuals })
        .collect()
}

/// Totals per country, sorted by country name
pub fn by_country(rows: &[ArrivalObservation]) -> Vec<CountryTotal> {
    let mut sums: BTreeMap<&str, u64> = BTreeMap::new();
    for row in rows {
        *sums.entry(row.country_name.as_str()).or_default() += row.individuals;
    }
    sums.into_iter()
        .map(|(country_name, individuals)| CountryTotal {
            country_name: country_name.to_string(),
            individuals,
        })
        .collect()
}

/// Year × country matrix of totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryYearPivot {
    /// Row labels, ascending
    pub years: Vec<i32>,
    /// Column labels, alphabetical
    pub countries: Vec<String>,
    /// `values[year_index][country_index]`; absent combinations are zero
    pub values: Vec<Vec<u64>>,
}

impl CountryYearPivot {
    /// Sum of one year's row
    pub fn year_total(&self, year_index: usize) -> u64 {
        self.values.get(year_index).map(|row| row.iter().sum()).unwrap_or(0)
    }

    /// Largest row total, the height of the tallest stacked bar
    pub fn max_year_total(&self) -> u64 {
        (0..self.years.len()).map(|i| self.year_total(i)).max().unwrap_or(0)
    }
}

/// Widen (country, year) totals into a year × country matrix
pub fn pivot_country_year(totals: &[CountryYearTotal]) -> CountryYearPivot {
    let years: Vec<i32> = totals.iter().map(|t| t.year).collect::<BTreeSet<_>>().into_iter().collect();
    let countries: Vec<String> = totals
        .iter()
        .map(|t| t.country_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut values = vec![vec![0u64; countries.len()]; years.len()];
    for total in totals {
        // Both lookups succeed: the labels were built from these totals
        if let (Ok(y), Ok(c)) = (
            years.binary_search(&total.year),
            countries.binary_search_by(|name| name.as_str().cmp(total.country_name.as_str())),
        ) {
            values[y][c] += total.individuals;
        }
    }

    CountryYearPivot {
        years,
        countries,
        values,
    }
}

/// The three exported aggregates of one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub country_year: Vec<CountryYearTotal>,
    pub year: Vec<YearTotal>,
    pub country: Vec<CountryTotal>,
}

impl Aggregates {
    pub fn compute(rows: &[ArrivalObservation]) -> Self {
        Self {
            country_year: by_country_year(rows),
            year: by_year(rows),
            country: by_country(rows),
        }
    }

    /// Pivot of the (country, year) totals
    pub fn pivot(&self) -> CountryYearPivot {
        pivot_country_year(&self.country_year)
    }
}
