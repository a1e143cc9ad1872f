//! CSV loader for trip logs.
//!
//! Columns are located by header name, so extra or reordered columns are
//! harmless. `User Type`, `Gender`, `Birth Year` and `End Time` are optional
//! and their presence is recorded in [`ColumnSet`].

use std::io::Read;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::DatasetCatalog;
use crate::error::{Error, Result};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// One ride as read from the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// 1-based line number in the source file.
    pub row: u64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub start_station: String,
    pub end_station: String,
    /// Observed trip length. May carry fractional seconds.
    pub trip_duration_seconds: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

/// Which optional columns the loaded dataset carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSet {
    pub end_time: bool,
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

/// The loader's output: records in source order plus column presence.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub id: String,
    pub columns: ColumnSet,
    pub records: Vec<TripRecord>,
}

struct ColumnIndex {
    start_time: usize,
    end_time: Option<usize>,
    start_station: usize,
    end_station: usize,
    trip_duration: usize,
    user_type: Option<usize>,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(dataset: &str, headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| Error::MissingColumn {
                dataset: dataset.to_string(),
                column: name,
            })
        };

        Ok(ColumnIndex {
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            trip_duration: require(TRIP_DURATION)?,
            user_type: find(USER_TYPE),
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn columns(&self) -> ColumnSet {
        ColumnSet {
            end_time: self.end_time.is_some(),
            user_type: self.user_type.is_some(),
            gender: self.gender.is_some(),
            birth_year: self.birth_year.is_some(),
        }
    }
}

/// Loads the dataset registered under `dataset_id` in `catalog`.
///
/// # Errors
///
/// [`Error::DatasetNotFound`] for an unknown identifier, [`Error::Io`] if the
/// file cannot be opened, and [`Error::MissingColumn`] /
/// [`Error::MalformedValue`] for unusable content.
#[tracing::instrument(skip(catalog))]
pub fn load(catalog: &DatasetCatalog, dataset_id: &str) -> Result<RawDataset> {
    let path = catalog.path_for(dataset_id)?;
    debug!(path = %path.display(), "Opening trip log");
    let file = std::fs::File::open(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    read_trips(dataset_id, file)
}

/// Parses a trip log from any reader. `dataset_id` is only used for messages.
pub fn read_trips<R: Read>(dataset_id: &str, reader: R) -> Result<RawDataset> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let index = ColumnIndex::from_headers(dataset_id, rdr.headers()?)?;
    let columns = index.columns();
    debug!(?columns, "Resolved optional columns");

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // Line 1 is the header.
        let row = record.position().map(|p| p.line()).unwrap_or(0);
        records.push(parse_record(&record, &index, row)?);
    }

    info!(dataset = dataset_id, trips = records.len(), "Trip log loaded");
    Ok(RawDataset {
        id: dataset_id.trim().to_lowercase(),
        columns,
        records,
    })
}

fn parse_record(record: &StringRecord, index: &ColumnIndex, row: u64) -> Result<TripRecord> {
    let cell = |i: usize| record.get(i).unwrap_or("");
    let optional = |i: Option<usize>| {
        i.map(cell)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let start_time = parse_timestamp(cell(index.start_time), START_TIME, row)?;
    let end_time = index
        .end_time
        .map(|i| parse_timestamp(cell(i), END_TIME, row))
        .transpose()?;

    let birth_year = match index.birth_year.map(cell) {
        Some(v) if !v.is_empty() => Some(parse_birth_year(v, row)?),
        _ => None,
    };

    Ok(TripRecord {
        row,
        start_time,
        end_time,
        start_station: parse_station(cell(index.start_station), START_STATION, row)?,
        end_station: parse_station(cell(index.end_station), END_STATION, row)?,
        trip_duration_seconds: parse_duration(cell(index.trip_duration), row)?,
        user_type: optional(index.user_type),
        gender: optional(index.gender),
        birth_year,
    })
}

fn malformed(column: &'static str, value: &str, row: u64) -> Error {
    Error::MalformedValue {
        row,
        column,
        value: value.to_string(),
    }
}

/// Parses `2017-06-23 15:09:32`, optionally with `T` and fractional seconds.
pub fn parse_timestamp(value: &str, column: &'static str, row: u64) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| malformed(column, value, row))
}

fn parse_station(value: &str, column: &'static str, row: u64) -> Result<String> {
    if value.is_empty() {
        return Err(malformed(column, value, row));
    }
    Ok(value.to_string())
}

fn parse_duration(value: &str, row: u64) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(malformed(TRIP_DURATION, value, row)),
    }
}

// Source files store birth years as floats ("1989.0") because of blank cells.
fn parse_birth_year(value: &str, row: u64) -> Result<i32> {
    match value.parse::<f64>() {
        Ok(year) if year.is_finite() && year.fract() == 0.0 && year.abs() < 10_000.0 => {
            Ok(year as i32)
        }
        _ => Err(malformed(BIRTH_YEAR, value, row)),
    }
}
