//! Date ranges for experience and education records.
//!
//! Dates are always emitted as `YYYY/MM/DD`. Parsing is more lenient so that
//! rows exported from the database (`2021-06-30`, `2021-06-30T00:00:00`) load
//! without a conversion step.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::ContentError;

/// Output pattern for every date handed to the serializer.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Accepted date-only input patterns, tried in order.
const DATE_INPUT_FORMATS: &[&str] = &[DATE_FORMAT, "%Y-%m-%d"];

/// Accepted datetime input patterns (the time part is discarded).
const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Format a date as `YYYY/MM/DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date from `YYYY/MM/DD`, `YYYY-MM-DD`, or a datetime string.
pub fn parse_date(value: &str) -> Result<NaiveDate, ContentError> {
    let value = value.trim();

    for format in DATE_INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    for format in DATETIME_INPUT_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(ContentError::InvalidDate(value.to_string()))
}

/// Start and optional end of a dated record. No end date means ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "serialize_date")]
    start_date: NaiveDate,
    #[serde(serialize_with = "serialize_optional_date")]
    end_date: Option<NaiveDate>,
}

impl DateRange {
    /// Build a range, rejecting an end date earlier than the start date.
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<Self, ContentError> {
        if let Some(end) = end_date {
            if end < start_date {
                return Err(ContentError::InvalidDateRange {
                    start: format_date(start_date),
                    end: format_date(end),
                });
            }
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// A range that has not concluded yet.
    pub fn ongoing(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date: None,
        }
    }

    /// Parse both ends from strings in any accepted input format.
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, ContentError> {
        let start_date = parse_date(start)?;
        let end_date = end.map(parse_date).transpose()?;
        Self::new(start_date, end_date)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_none()
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_date(*date))
}

fn serialize_optional_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&format_date(*date)),
        None => serializer.serialize_none(),
    }
}
