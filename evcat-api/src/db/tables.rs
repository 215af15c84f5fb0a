//! Whole-table reads for the `/data/:table` endpoint

use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::rows::row_to_map;

/// Tables never exposed by the dump endpoint
pub const PRIVATE_TABLES: &[&str] = &["users"];

/// User tables in alphabetical order, excluding SQLite internals
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
          AND name NOT LIKE 'sqlite_%'
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Every row of `table`
///
/// The caller must have checked `table` against `list_tables`; identifiers
/// cannot be bound as parameters.
pub async fn dump_table(pool: &SqlitePool, table: &str) -> Result<Vec<Map<String, Value>>, sqlx::Error> {
    let rows = sqlx::query(&format!("SELECT * FROM \"{}\"", table))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(row_to_map).collect())
}
