//! Repository implementations for database access
//!
//! Handlers talk to the [`CategoryStore`] and [`DeviceStore`] traits; the
//! Postgres repositories are the production implementations and tests swap
//! in an in-memory one.
//!
//! Each repository follows these patterns:
//! - Parameterized statements only
//! - Transactions for multi-step writes
//! - Zero rows affected on update/delete means `NotFound`

pub mod categories;
pub mod devices;

use async_trait::async_trait;

use crate::models::{Category, CategoryName, Device, DeviceDraft, DeviceFilter};

pub use categories::CategoryRepo;
pub use devices::DeviceRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: i64 },

    #[error("conflict: {resource} '{id}' {reason}")]
    Conflict {
        resource: &'static str,
        id: i64,
        reason: &'static str,
    },

    #[error("unknown category ids: {0:?}")]
    UnknownCategories(Vec<i64>),
}

/// Category persistence
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories with their device counts, in id order.
    async fn list(&self) -> Result<Vec<Category>, DbError>;

    async fn get(&self, id: i64) -> Result<Category, DbError>;

    /// Insert a category and return its id.
    async fn create(&self, name: CategoryName) -> Result<i64, DbError>;

    async fn update(&self, id: i64, name: CategoryName) -> Result<(), DbError>;

    /// Delete a category that no device links to.
    ///
    /// Fails with `Conflict` while links exist.
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

/// Device persistence, including the device/category links
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// All devices with their categories, in id order.
    async fn list(&self) -> Result<Vec<Device>, DbError>;

    async fn get(&self, id: i64) -> Result<Device, DbError>;

    /// Insert a device with its category links and return its id.
    async fn create(&self, draft: DeviceDraft) -> Result<i64, DbError>;

    /// Overwrite a device and replace its whole category set.
    async fn update(&self, id: i64, draft: DeviceDraft) -> Result<(), DbError>;

    /// Delete a device and its category links.
    async fn delete(&self, id: i64) -> Result<(), DbError>;

    /// Devices matching `filter`, in id order.
    async fn search(&self, filter: &DeviceFilter) -> Result<Vec<Device>, DbError> {
        let devices = self.list().await?;
        Ok(devices.into_iter().filter(|d| filter.matches(d)).collect())
    }
}
