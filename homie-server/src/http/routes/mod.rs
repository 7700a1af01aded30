//! Route handlers organized by resource

pub mod categories;
pub mod devices;
pub mod health;

use serde::{Deserialize, Serialize};

use crate::models::LooseNumber;

/// Body of `DELETE` requests
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Option<LooseNumber>,
}

/// Response for successful creates
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: &'static str,
}

/// Response for successful updates and deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
