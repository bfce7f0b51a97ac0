//! Date and datetime wire types with fixed JSON formats.
//!
//! Clients send datetimes as `YYYY-MM-DD HH:MM:SS` and receive them as `YYYY-MM-DDTHH:MM:SS+00:00`.
//! Dates use `YYYY-MM-DD` both ways. The nullable variants accept and emit JSON `null`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub const FORMAT_DATETIME_INPUT: &str = "%Y-%m-%d %H:%M:%S";
pub const FORMAT_DATETIME_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S%:z";
pub const FORMAT_DATE: &str = "%Y-%m-%d";

const MAX_YEAR: i32 = 10000;

fn check_year<E: de::Error>(year: i32) -> Result<(), E> {
    if year <= 0 || year > MAX_YEAR {
        return Err(E::custom(
            "time year is not a valid year value, must be greater than 1 and less than 10000",
        ));
    }
    Ok(())
}

/// Input format first; RFC 3339 is also accepted so rows read back from storage decode.
fn parse_datetime<E: de::Error>(s: &str) -> Result<DateTime<Utc>, E> {
    let dt = match NaiveDateTime::parse_from_str(s, FORMAT_DATETIME_INPUT) {
        Ok(naive) => naive.and_utc(),
        Err(e) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|_| E::custom(format!("invalid datetime '{}': {}", s, e)))?,
    };
    check_year(dt.year())?;
    Ok(dt)
}

fn parse_date<E: de::Error>(s: &str) -> Result<NaiveDate, E> {
    let d = NaiveDate::parse_from_str(s, FORMAT_DATE)
        .map_err(|e| E::custom(format!("invalid date '{}': {}", s, e)))?;
    check_year(d.year())?;
    Ok(d)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datetime(pub DateTime<Utc>);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullDatetime(pub Option<DateTime<Utc>>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date(pub NaiveDate);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullDate(pub Option<NaiveDate>);

impl Serialize for Datetime {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&self.0.format(FORMAT_DATETIME_OUTPUT))
    }
}

impl<'de> Deserialize<'de> for Datetime {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        parse_datetime(&s).map(Datetime)
    }
}

impl Serialize for NullDatetime {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(dt) => Datetime(*dt).serialize(s),
            None => s.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NullDatetime {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) => parse_datetime(&s).map(|dt| NullDatetime(Some(dt))),
            None => Ok(NullDatetime(None)),
        }
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&self.0.format(FORMAT_DATE))
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        parse_date(&s).map(Date)
    }
}

impl Serialize for NullDate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(date) => Date(*date).serialize(s),
            None => s.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NullDate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) => parse_date(&s).map(|date| NullDate(Some(date))),
            None => Ok(NullDate(None)),
        }
    }
}
