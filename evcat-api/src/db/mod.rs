//! Store access for evcat-api
//!
//! All reads go through `sqlx` with bound parameters. Rows that leave the
//! service as JSON are converted column by column in `rows`.

pub mod events;
pub mod rows;
pub mod tables;
pub mod users;
