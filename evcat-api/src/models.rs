//! Catalog records as seen by the search pipeline

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One row of the `events` table, every column keyed by name
///
/// Only `organizer` and `start_date` are interpreted by the pipeline; the
/// remaining columns pass through to the response untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Event {
    columns: Map<String, Value>,
}

impl Event {
    pub fn from_columns(columns: Map<String, Value>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.columns
    }

    /// Organizer name reference
    pub fn organizer(&self) -> Option<&str> {
        self.columns.get("organizer").and_then(Value::as_str)
    }

    /// Raw start date-time, e.g. `"15. 3. 2024 09:00"`
    pub fn start_date(&self) -> Option<&str> {
        self.columns.get("start_date").and_then(Value::as_str)
    }
}

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Organizer address, with coordinates when geocoding succeeded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn unresolved(address: String) -> Self {
        Self {
            address,
            latitude: None,
            longitude: None,
        }
    }

    pub fn resolved(address: String, coordinates: Coordinates) -> Self {
        Self {
            address,
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Event plus its organizer's location
///
/// `location` is `None` when the organizer reference did not resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub location: Option<Location>,
}

impl EnrichedEvent {
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.as_ref().and_then(Location::coordinates)
    }
}

/// Row of the `organizers` table
///
/// The accessibility columns are nullable markers; the query that loads
/// organizers turns "non-null" into `true`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Organizer {
    pub name: String,
    pub address: String,
    pub parking: bool,
    pub disabled_access: bool,
    pub pets_allowed: bool,
}

/// Snapshot of all organizers, keyed by exact name
#[derive(Debug, Clone, Default)]
pub struct OrganizerDirectory {
    by_name: HashMap<String, Organizer>,
}

impl OrganizerDirectory {
    /// Build from rows in store order; the first row for a name wins
    pub fn from_rows(rows: impl IntoIterator<Item = Organizer>) -> Self {
        let mut by_name = HashMap::new();
        for organizer in rows {
            by_name.entry(organizer.name.clone()).or_insert(organizer);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Organizer> {
        self.by_name.get(name)
    }

    /// Organizer referenced by an event, if it resolves
    pub fn for_event(&self, event: &Event) -> Option<&Organizer> {
        event.organizer().and_then(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
