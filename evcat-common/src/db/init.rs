//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates the events catalog
//! schema. Every statement is idempotent, so this runs on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps searches readable while a registration commits
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all catalog tables
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for table in ["categories", "event_types", "age_groups"] {
        create_lookup_table(pool, table).await?;
    }
    create_organizers_table(pool).await?;
    create_events_table(pool).await?;
    create_users_table(pool).await?;
    Ok(())
}

/// Lookup tables hold the names a filter dimension may take
async fn create_lookup_table(pool: &SqlitePool, table: &str) -> Result<()> {
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (name TEXT PRIMARY KEY NOT NULL)",
        table
    ))
    .execute(pool)
    .await?;
    Ok(())
}

/// Accessibility columns are nullable markers: any non-null value means "yes"
async fn create_organizers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizers (
            name TEXT NOT NULL,
            address TEXT,
            parking TEXT,
            disabled_access TEXT,
            pets_allowed TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_organizers_name ON organizers(name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// `organizer` is a plain name reference, not a foreign key: events whose
/// organizer has no row are still valid catalog entries. `price` has REAL
/// affinity so numeric prices come back as numbers.
async fn create_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            category TEXT,
            event_type TEXT,
            organizer TEXT,
            start_date TEXT NOT NULL,
            price REAL,
            image TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    for column in ["category", "event_type", "organizer"] {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_events_{col} ON events({col})",
            col = column
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
