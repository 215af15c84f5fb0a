//! Event search endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::models::EnrichedEvent;
use crate::search::SearchCriteria;
use crate::AppState;

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub events: Vec<EnrichedEvent>,
}

/// POST /api/events/search
///
/// Filters, enriches and sorts events per the request body. Every body field
/// is optional; `{}` returns all events, earliest first.
pub async fn search_events(
    State(state): State<AppState>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(criteria) = payload?;
    let events = state.search.run(&criteria).await?;

    info!(results = events.len(), "Event search complete");

    Ok(Json(SearchResponse {
        success: true,
        message: "Events fetched successfully".to_string(),
        events,
    }))
}
