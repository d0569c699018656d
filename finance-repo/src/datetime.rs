//! Lenient parsing of transaction timestamps.
//!
//! Clients send either a full timestamp or just a calendar day, so both are accepted. Anything
//! without an offset is taken to be UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Unable to parse '{0}' as a date or timestamp")]
pub struct DateParseError(pub String);

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(start_of_day(date));
    }
    Err(DateParseError(value.to_owned()))
}

/// Parses only the calendar day of `value`, discarding any time component.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateParseError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_datetime(value).map(|datetime| datetime.date_naive())
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// First instant after `date`, for use as an exclusive upper bound.
pub fn start_of_next_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.succ_opt().map(start_of_day)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_datetime(&value).map_err(serde::de::Error::custom)
}
