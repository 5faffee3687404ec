//! Value parsers for amounts and dates

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::*;

/// Number of days after which an entry date is assumed to sit in the
/// neighbouring year of its value date
pub const ENTRY_DATE_WINDOW_DAYS: i64 = 330;

/// Two-digit years up to this value belong to the 21st century
pub const CENTURY_PIVOT: u32 = 69;

static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<integer>[0-9]*)(?:,(?P<fraction>[0-9]*))?$")
        .expect("amount pattern is valid")
});

impl Amount {
    /// Parse an unsigned wire amount such as `123,23` or `960`
    pub fn parse(text: &str) -> Mt940Result<Amount> {
        let malformed = || Mt940Error::MalformedAmount {
            tag_id: None,
            raw: text.to_string(),
        };

        let caps = AMOUNT_PATTERN.captures(text).ok_or_else(malformed)?;
        let integer = caps.name("integer").map_or("", |m| m.as_str());
        let fraction = caps.name("fraction").map_or("", |m| m.as_str());

        if integer.is_empty() || fraction.len() > 2 {
            return Err(malformed());
        }

        let minor_units = format!("{}{:0<2}", integer, fraction)
            .parse::<i64>()
            .map_err(|_| malformed())?;

        Ok(Amount::from_minor_units(minor_units))
    }
}

fn parse_number(text: &str, raw: &str) -> Mt940Result<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Mt940Error::InvalidDate {
            tag_id: None,
            raw: raw.to_string(),
        });
    }
    text.parse().map_err(|_| Mt940Error::InvalidDate {
        tag_id: None,
        raw: raw.to_string(),
    })
}

/// Resolve a two-digit year to a full year
pub fn expand_year(year2: u32) -> i32 {
    if year2 <= CENTURY_PIVOT {
        2000 + year2 as i32
    } else {
        1900 + year2 as i32
    }
}

/// Build a date from the `YY`, `MM` and `DD` parts of a tag
pub fn parse_date(year: &str, month: &str, day: &str) -> Mt940Result<NaiveDate> {
    let raw = format!("{}{}{}", year, month, day);
    let full_year = expand_year(parse_number(year, &raw)?);
    let month = parse_number(month, &raw)?;
    let day = parse_number(day, &raw)?;

    NaiveDate::from_ymd_opt(full_year, month, day).ok_or(Mt940Error::InvalidDate {
        tag_id: None,
        raw,
    })
}

/// Build a date and time from a tag 13D payload
pub fn parse_date_time(
    year: &str,
    month: &str,
    day: &str,
    hour: &str,
    minute: &str,
) -> Mt940Result<NaiveDateTime> {
    let date = parse_date(year, month, day)?;
    let raw = format!("{}{}{}{}{}", year, month, day, hour, minute);
    let time = NaiveTime::from_hms_opt(parse_number(hour, &raw)?, parse_number(minute, &raw)?, 0)
        .ok_or(Mt940Error::InvalidDate { tag_id: None, raw })?;

    Ok(date.and_time(time))
}

/// Resolve a year-less entry date against its value date
///
/// The candidate takes the value date's year. A candidate lying more than
/// `window_days` before the value date moves to the next year, one lying
/// more than `window_days` after it moves to the previous year.
pub fn resolve_entry_date(
    value_date: NaiveDate,
    month: &str,
    day: &str,
    window_days: i64,
) -> Mt940Result<NaiveDate> {
    let raw = format!("{}{}", month, day);
    let invalid = || Mt940Error::InvalidDate {
        tag_id: None,
        raw: raw.clone(),
    };
    let month = parse_number(month, &raw)?;
    let day = parse_number(day, &raw)?;

    let candidate = NaiveDate::from_ymd_opt(value_date.year(), month, day).ok_or_else(invalid)?;
    let gap = (value_date - candidate).num_days();

    let year = if gap > window_days {
        value_date.year() + 1
    } else if -gap > window_days {
        value_date.year() - 1
    } else {
        return Ok(candidate);
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
