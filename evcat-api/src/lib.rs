//! evcat-api library - events catalog service
//!
//! Event search with filtering, accessibility joins, geocoding and distance
//! sorting, plus user registration and table dumps over a SQLite store.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod search;

use search::geocode::Geocoder;
use search::{EventSearch, SearchOptions};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Search pipeline bound to the same pool
    pub search: EventSearch,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, geocoder: Arc<dyn Geocoder>, options: SearchOptions) -> Self {
        let search = EventSearch::new(db.clone(), geocoder, options);
        Self { db, search }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/events/search", post(api::search_events))
        .route("/api/register", post(api::register))
        .route("/api/login", post(api::login))
        .route("/data/:table", get(api::get_table_data))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
