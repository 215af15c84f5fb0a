//! Event start date parsing
//!
//! Start dates are stored as `"{day}. {month}. {year} {HH}:{MM}"`, e.g.
//! `"15. 3. 2024 09:00"`. The day and month tokens carry a trailing separator.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed date '{input}': {reason}")]
pub struct MalformedDateError {
    pub input: String,
    pub reason: String,
}

impl MalformedDateError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parse an event start date into a timestamp
pub fn parse_event_date(input: &str) -> Result<NaiveDateTime, MalformedDateError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [day, month, year, time] = tokens.as_slice() else {
        return Err(MalformedDateError::new(
            input,
            format!("expected 4 tokens, found {}", tokens.len()),
        ));
    };

    let day: u32 = parse_number(input, strip_separator(day), "day")?;
    let month: u32 = parse_number(input, strip_separator(month), "month")?;
    let year: i32 = parse_number(input, year, "year")?;

    let (hour, minute) = time
        .split_once(':')
        .ok_or_else(|| MalformedDateError::new(input, "time must be HH:MM"))?;
    let hour: u32 = parse_number(input, hour, "hour")?;
    let minute: u32 = parse_number(input, minute, "minute")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| MalformedDateError::new(input, "no such calendar date"))?
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| MalformedDateError::new(input, "no such time of day"))
}

/// Drop one trailing non-digit separator (`"15."` -> `"15"`)
fn strip_separator(token: &str) -> &str {
    match token.chars().last() {
        Some(c) if !c.is_ascii_digit() => &token[..token.len() - c.len_utf8()],
        _ => token,
    }
}

fn parse_number<T: std::str::FromStr>(
    input: &str,
    token: &str,
    field: &str,
) -> Result<T, MalformedDateError> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(MalformedDateError::new(
            input,
            format!("{} '{}' is not numeric", field, token),
        ));
    }
    token
        .parse()
        .map_err(|_| MalformedDateError::new(input, format!("{} '{}' out of range", field, token)))
}
