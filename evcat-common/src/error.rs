//! Error type shared by the evcat crates
//!
//! Covers what can go wrong before the service is up: reading the config
//! file and opening or initializing the database.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Opening the pool or creating the schema failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database directory or config file could not be read or created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file missing (when named explicitly) or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}
