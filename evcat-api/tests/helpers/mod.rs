//! Test Helper Utilities
//!
//! Shared setup for evcat-api integration tests: a seeded temporary
//! database, a deterministic geocoder and request/response shortcuts.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

use evcat_api::models::Coordinates;
use evcat_api::search::geocode::{GeocodeError, Geocoder};
use evcat_api::search::SearchOptions;
use evcat_api::{build_router, AppState};
use evcat_common::db::init_database;

/// Organizer rows: name, address, parking, disabled_access, pets_allowed
pub const ORGANIZERS: &[(&str, &str, Option<&str>, Option<&str>, Option<&str>)] = &[
    ("Org A", "Ilica 1, Zagreb", Some("yes"), None, None),
    ("Org B", "Vukovarska 10, Zagreb", None, Some("ramp"), Some("yes")),
    ("Org C", "Riva 1, Split", None, None, None),
    ("Lisinski's Hall", "Trg Stjepana Radica 4, Zagreb", Some("garage"), Some("lift"), None),
    ("Outage Club", "unreachable road 7", None, None, None),
];

/// Event rows: id, title, category, event_type, organizer, start_date
pub const EVENTS: &[(i64, &str, &str, &str, &str, &str)] = &[
    (1, "Jazz night", "Music", "Concert", "Org A", "15. 3. 2024 20:00"),
    (2, "Chess open", "Games", "Tournament", "Org B", "10. 3. 2024 09:00"),
    (3, "Summer fest", "Music", "Festival", "Org C", "1. 7. 2024 18:00"),
    (4, "Piano recital", "Music", "Concert", "Lisinski's Hall", "20. 3. 2024 19:30"),
    (5, "Pop-up market", "Market", "Fair", "Nobody Known", "5. 3. 2024 10:00"),
    (6, "Rave", "Music", "Party", "Outage Club", "22. 3. 2024 23:00"),
];

/// Fixed address book; "unreachable" addresses fail like a network error
pub struct StaticGeocoder {
    known: HashMap<&'static str, Coordinates>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self {
            known: HashMap::from([
                ("Ilica 1, Zagreb", Coordinates::new(45.8131, 15.9720)),
                ("Vukovarska 10, Zagreb", Coordinates::new(45.8010, 15.9990)),
                ("Riva 1, Split", Coordinates::new(43.5081, 16.4402)),
                ("Trg Stjepana Radica 4, Zagreb", Coordinates::new(45.8000, 15.9800)),
            ]),
        }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        if address.contains("unreachable") {
            return Err(GeocodeError::Network("connection refused".to_string()));
        }
        Ok(self.known.get(address).copied())
    }
}

/// Every lookup fails
pub struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Err(GeocodeError::Api {
            status: "OVER_QUERY_LIMIT".to_string(),
            message: "quota exhausted".to_string(),
        })
    }
}

/// Create a temporary database with the schema applied
///
/// TempDir must be kept alive for the duration of the test.
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&temp_dir.path().join("evcat_test.db"))
        .await
        .expect("Should initialize database");
    (temp_dir, pool)
}

/// Insert the fixture organizers, events and lookup values
pub async fn seed_catalog(pool: &SqlitePool) {
    for (name, address, parking, disabled, pets) in ORGANIZERS {
        sqlx::query(
            "INSERT INTO organizers (name, address, parking, disabled_access, pets_allowed) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(*name)
        .bind(*address)
        .bind(*parking)
        .bind(*disabled)
        .bind(*pets)
        .execute(pool)
        .await
        .expect("Should insert organizer");
    }

    for (id, title, category, event_type, organizer, start_date) in EVENTS {
        sqlx::query(
            "INSERT INTO events (id, title, description, category, event_type, organizer, start_date, price, image) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL)",
        )
        .bind(*id)
        .bind(*title)
        .bind(format!("{} description", title))
        .bind(*category)
        .bind(*event_type)
        .bind(*organizer)
        .bind(*start_date)
        .bind(10.5)
        .execute(pool)
        .await
        .expect("Should insert event");
    }

    for name in ["Music", "Games", "Market"] {
        sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .expect("Should insert category");
    }
}

/// Router over `pool` using `geocoder`
pub fn setup_app(pool: SqlitePool, geocoder: Arc<dyn Geocoder>) -> Router {
    build_router(AppState::new(pool, geocoder, SearchOptions::default()))
}

/// Seeded database plus router with the static geocoder
pub async fn seeded_app() -> (TempDir, SqlitePool, Router) {
    let (dir, pool) = create_test_db().await;
    seed_catalog(&pool).await;
    let app = setup_app(pool.clone(), Arc::new(StaticGeocoder::new()));
    (dir, pool, app)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Event ids of a search response, in response order
pub fn event_ids(body: &Value) -> Vec<i64> {
    body["events"]
        .as_array()
        .expect("events array")
        .iter()
        .map(|e| e["id"].as_i64().expect("numeric id"))
        .collect()
}
