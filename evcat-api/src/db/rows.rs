//! Row to JSON conversion

use serde_json::{json, Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, ValueRef};

/// Convert one row into a column-name keyed JSON object
pub fn row_to_map(row: &SqliteRow) -> Map<String, Value> {
    row.columns()
        .iter()
        .map(|column| {
            let i = column.ordinal();
            (column.name().to_string(), column_value(row, i))
        })
        .collect()
}

/// SQLite values are dynamically typed; try the storage classes in turn
fn column_value(row: &SqliteRow, i: usize) -> Value {
    let Ok(raw) = row.try_get_raw(i) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }

    row.try_get::<String, _>(i)
        .map(Value::String)
        .or_else(|_| row.try_get::<i64, _>(i).map(|v| json!(v)))
        .or_else(|_| row.try_get::<f64, _>(i).map(|v| json!(v)))
        .unwrap_or(Value::Null)
}
