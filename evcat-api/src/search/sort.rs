//! Result ordering
//!
//! `earliest` orders by full start timestamp; `location` orders by haversine
//! distance from a reference point. Either can be reversed. Events without a
//! sort key (unparseable date, no coordinates) always trail, in input order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use super::date::parse_event_date;
use crate::models::{Coordinates, EnrichedEvent};

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Earliest,
    Location,
}

/// Requested ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SortDirective {
    pub param: SortMode,
    pub reverse: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Reference coordinate outside the globe
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Reference {axis} {value} is outside [-{limit}, {limit}]")]
pub struct InvalidReferenceError {
    pub axis: &'static str,
    pub value: f64,
    pub limit: f64,
}

fn check_axis(axis: &'static str, value: Option<f64>, limit: f64) -> Result<(), InvalidReferenceError> {
    match value {
        Some(v) if !v.is_finite() || v.abs() > limit => Err(InvalidReferenceError {
            axis,
            value: v,
            limit,
        }),
        _ => Ok(()),
    }
}

impl SortDirective {
    /// Reject request coordinates no point on Earth has
    pub fn validate(&self) -> Result<(), InvalidReferenceError> {
        check_axis("latitude", self.latitude, 90.0)?;
        check_axis("longitude", self.longitude, 180.0)
    }

    /// Reference point, each missing coordinate taken from `default`
    pub fn reference(&self, default: Coordinates) -> Coordinates {
        Coordinates::new(
            self.latitude.unwrap_or(default.latitude),
            self.longitude.unwrap_or(default.longitude),
        )
    }
}

/// Great-circle distance in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    // Rounding can push h just past 1 for antipodal points
    let h = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Order events per `directive`
pub fn sort_events(
    events: Vec<EnrichedEvent>,
    directive: &SortDirective,
    default_reference: Coordinates,
) -> Vec<EnrichedEvent> {
    match directive.param {
        SortMode::Earliest => sort_with_missing_last(events, start_timestamp, directive.reverse),
        SortMode::Location => {
            let reference = directive.reference(default_reference);
            sort_with_missing_last(
                events,
                |event| event.coordinates().map(|c| haversine_km(reference, c)),
                directive.reverse,
            )
        }
    }
}

fn start_timestamp(event: &EnrichedEvent) -> Option<NaiveDateTime> {
    event
        .event
        .start_date()
        .and_then(|raw| parse_event_date(raw).ok())
}

/// Stable sort on a precomputed key; keyless events go last regardless of
/// direction
fn sort_with_missing_last<K, F>(events: Vec<EnrichedEvent>, key: F, reverse: bool) -> Vec<EnrichedEvent>
where
    K: PartialOrd,
    F: Fn(&EnrichedEvent) -> Option<K>,
{
    let mut keyed: Vec<(Option<K>, EnrichedEvent)> =
        events.into_iter().map(|event| (key(&event), event)).collect();

    keyed.sort_by(|(a, _), (b, _)| compare_missing_last(a.as_ref(), b.as_ref(), reverse));

    keyed.into_iter().map(|(_, event)| event).collect()
}

fn compare_missing_last<K: PartialOrd>(a: Option<&K>, b: Option<&K>, reverse: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
