//! homie-server: HTTP API for the smart home device catalog
//!
//! Devices and categories live in PostgreSQL; devices link to categories
//! through the `device_category` join table. Handlers reach the database
//! only through the [`db::CategoryStore`] and [`db::DeviceStore`] traits.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, ServerConfig};
pub use http::{build_router, run_server, ApiError, AppState, ServerError};
