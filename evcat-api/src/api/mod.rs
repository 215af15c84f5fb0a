//! HTTP API handlers for evcat-api

pub mod events;
pub mod health;
pub mod table;
pub mod users;

pub use events::search_events;
pub use health::health_routes;
pub use table::get_table_data;
pub use users::{login, register};
