//! CSV export of the table and its aggregates

use crate::aggregate::Aggregates;
use crate::table::ArrivalTable;
use csv::WriterBuilder;
use medarrivals_common::{ArrivalsError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DATA_FILE: &str = "data.csv";
pub const COUNTRY_YEAR_FILE: &str = "data_country_year.csv";
pub const YEAR_FILE: &str = "data_year.csv";
pub const COUNTRY_FILE: &str = "data_country.csv";

const DATA_HEADER: [&str; 10] = [
    "geomaster_name",
    "admin_level",
    "centroid_lon",
    "centroid_lat",
    "month",
    "year",
    "population_groups_concat",
    "individuals",
    "country_name",
    "last_update",
];
const COUNTRY_YEAR_HEADER: [&str; 3] = ["country_name", "year", "individuals"];
const YEAR_HEADER: [&str; 2] = ["year", "individuals"];
const COUNTRY_HEADER: [&str; 2] = ["country_name", "individuals"];

/// Paths of the four written files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub data: PathBuf,
    pub country_year: PathBuf,
    pub year: PathBuf,
    pub country: PathBuf,
}

impl ExportedFiles {
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [&self.data, &self.country_year, &self.year, &self.country]
            .into_iter()
            .map(PathBuf::as_path)
    }
}

/// Writes CSV files into an existing directory, overwriting previous runs
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    /// The directory is not created; it must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ArrivalsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory '{}' does not exist", dir.display()),
            )));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data.csv` and the three aggregate files
    pub fn export_all(&self, table: &ArrivalTable, aggregates: &Aggregates) -> Result<ExportedFiles> {
        let files = ExportedFiles {
            data: self.dir.join(DATA_FILE),
            country_year: self.dir.join(COUNTRY_YEAR_FILE),
            year: self.dir.join(YEAR_FILE),
            country: self.dir.join(COUNTRY_FILE),
        };

        write_csv(&files.data, &DATA_HEADER, table.rows())?;
        write_csv(&files.country_year, &COUNTRY_YEAR_HEADER, &aggregates.country_year)?;
        write_csv(&files.year, &YEAR_HEADER, &aggregates.year)?;
        write_csv(&files.country, &COUNTRY_HEADER, &aggregates.country)?;

        info!(dir = %self.dir.display(), rows = table.len(), "Exported CSV files");
        Ok(files)
    }
}

/// Write `rows` under an explicit header.
///
/// The header is written even when `rows` is empty.
pub fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

/// Read back a file written by [`write_csv`]
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
