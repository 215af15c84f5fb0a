//! # evcat common library
//!
//! Shared code for the events catalog service:
//! - Error and result types
//! - Configuration loading
//! - Database initialization and schema
//! - Credential hashing for registered users

pub mod config;
pub mod credentials;
pub mod db;
pub mod error;

pub use error::{Error, Result};
