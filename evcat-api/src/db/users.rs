//! User account storage

use sqlx::SqlitePool;
use uuid::Uuid;

use evcat_common::credentials::PasswordHash;

/// Stored credentials for one user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub guid: String,
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
}

/// Insert a new user, returning its guid
///
/// A taken username surfaces as a unique-constraint database error.
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password: &PasswordHash,
) -> Result<String, sqlx::Error> {
    let guid = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO users (guid, username, password_hash, password_salt) VALUES (?, ?, ?, ?)",
    )
    .bind(&guid)
    .bind(username)
    .bind(&password.hash)
    .bind(&password.salt)
    .execute(pool)
    .await?;

    Ok(guid)
}

pub async fn find_user(pool: &SqlitePool, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        "SELECT guid, username, password_hash, password_salt FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}
