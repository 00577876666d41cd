//! Parsing of the date/time strings produced by the browser date inputs.
//!
//! Values are kept as strings inside the records (that is what the inputs
//! deliver); these helpers are used by the field kind checks and by the
//! cross-field refinements.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}

/// Parse an optional date field; blank strings count as "not given".
pub fn optional_date(value: &str) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        None
    } else {
        parse_date(value)
    }
}
