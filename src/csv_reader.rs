use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BikeshareError, Result};

pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// One bike rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "Start Time", deserialize_with = "timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "End Time", deserialize_with = "timestamp")]
    pub end_time: NaiveDateTime,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    #[serde(rename = "User Type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(
        rename = "Birth Year",
        default,
        deserialize_with = "birth_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<i32>,
}

/// Which optional columns a city file declares in its header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalColumns {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl OptionalColumns {
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let has = |name: &str| headers.iter().any(|h| h.trim() == name);
        OptionalColumns {
            user_type: has(USER_TYPE),
            gender: has(GENDER),
            birth_year: has(BIRTH_YEAR),
        }
    }
}

fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn birth_year<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i32>, D::Error> {
    // Files with blanks in the column store years as floats, e.g. "1989.0".
    let raw = Option::<f64>::deserialize(deserializer)?;
    match raw {
        Some(year) if year.is_finite() => Ok(Some(year.round() as i32)),
        Some(_) | None => Ok(None),
    }
}

pub fn read_trips_from<R: Read>(reader: R) -> std::result::Result<(OptionalColumns, Vec<TripRecord>), csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let columns = OptionalColumns::from_headers(rdr.headers()?);
    let mut records = Vec::<TripRecord>::new();
    for result in rdr.deserialize() {
        let record: TripRecord = result?;
        records.push(record);
    }
    Ok((columns, records))
}

pub fn read_trips(path: &Path) -> Result<(OptionalColumns, Vec<TripRecord>)> {
    let file = File::open(path).map_err(|source| BikeshareError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    read_trips_from(file).map_err(|source| BikeshareError::Csv {
        path: path.to_path_buf(),
        source,
    })
}
