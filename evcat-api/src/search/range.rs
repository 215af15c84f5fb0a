//! Start date window filter
//!
//! Compares calendar dates only; the time of day is discarded on both sides.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::date::parse_event_date;
use crate::models::Event;

/// Inclusive date window; a missing bound is unbounded on that side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Whether an event's start date falls inside the window
    ///
    /// Events whose start date is missing or unparseable are outside every
    /// bounded window and inside the unbounded one.
    pub fn admits(&self, event: &Event) -> bool {
        if self.is_unbounded() {
            return true;
        }

        let Some(raw) = event.start_date() else {
            warn!(event = ?event.columns().get("id"), "Event has no start date, excluded from date range");
            return false;
        };

        match parse_event_date(raw) {
            Ok(start) => self.contains(start.date()),
            Err(e) => {
                warn!(start_date = %raw, error = %e, "Unparseable start date, excluded from date range");
                false
            }
        }
    }
}

/// Keep events whose start date falls within `range` (lazy)
pub fn filter_by_date_range(
    events: impl IntoIterator<Item = Event>,
    range: DateRange,
) -> impl Iterator<Item = Event> {
    events.into_iter().filter(move |event| range.admits(event))
}

/// Parse a request date bound: `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS`
/// or RFC 3339. Only the calendar date is kept.
pub fn parse_date_bound(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Serde adapter for optional date bounds; `null` and `""` mean "no bound"
pub fn deserialize_date_bound<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date_bound(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date bound '{}'", s))),
    }
}
