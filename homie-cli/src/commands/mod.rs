//! Command implementations for the homie CLI

pub mod catalog;
pub mod init_db;
pub mod serve;

pub use catalog::{run_categories, run_devices};
pub use init_db::run_init_db;
pub use serve::run_serve;
