//! Whole-table dump
//!
//! `GET /data/:table` returns every row of a catalog table as JSON objects,
//! e.g. the lookup tables a client needs to populate its filter lists.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};

use crate::db::tables::{dump_table, list_tables, PRIVATE_TABLES};
use crate::error::ApiError;
use crate::AppState;

/// GET /data/:table
pub async fn get_table_data(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    if !is_valid_table_name(&table_name) {
        return Err(ApiError::BadRequest(format!(
            "Invalid table name: {}",
            table_name
        )));
    }

    let tables = list_tables(&state.db).await?;
    if !tables.contains(&table_name) || PRIVATE_TABLES.contains(&table_name.as_str()) {
        return Err(ApiError::NotFound(format!("Unknown table: {}", table_name)));
    }

    Ok(Json(dump_table(&state.db, &table_name).await?))
}

/// Plain identifiers only: alphanumerics and underscore
fn is_valid_table_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.is_empty()
        && name.len() < 100
}
