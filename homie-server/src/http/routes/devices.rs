//! Device endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{CreatedResponse, IdRequest, MessageResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidId};
use crate::http::server::AppState;
use crate::models::{
    required_id, Device, DeviceDraft, DeviceFilter, DeviceInput, LooseNumber, SearchParams,
};

/// Optional `?id=` on the collection route
#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub id: Option<String>,
}

/// GET /devices - list all devices, or one device when `?id=` is given
async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceQuery>,
) -> Result<Response, ApiError> {
    if let Some(raw) = query.id {
        let id = LooseNumber::Text(raw).to_id("id")?;
        let device = state.devices.get(id).await?;
        return Ok(Json(device).into_response());
    }

    let devices = state.devices.list().await?;
    Ok(Json(devices).into_response())
}

/// GET /devices/{id} - get a single device
async fn get_device(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Device>, ApiError> {
    let device = state.devices.get(id).await?;
    Ok(Json(device))
}

/// GET /devices/search - filter by text and power range
async fn search_devices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Device>>, ApiError> {
    let filter = DeviceFilter::new(&params)?;
    let devices = state.devices.search(&filter).await?;
    Ok(Json(devices))
}

/// POST /devices - create a device with its categories
async fn create_device(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let draft = DeviceDraft::validate(&input)?;
    let id = state.devices.create(draft).await?;
    tracing::info!(id, "device created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "device created",
        }),
    ))
}

/// PUT /devices - overwrite a device and replace its categories
async fn update_device(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<DeviceInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (id, draft) = DeviceDraft::validate_with_id(&input)?;
    state.devices.update(id, draft).await?;
    tracing::info!(id, "device updated");

    Ok(Json(MessageResponse {
        message: "device updated",
    }))
}

/// DELETE /devices - delete a device and its category links
async fn delete_device(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<IdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = required_id(req.id.as_ref(), "id")?;
    state.devices.delete(id).await?;
    tracing::info!(id, "device deleted");

    Ok(Json(MessageResponse {
        message: "device deleted",
    }))
}

/// Device routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/devices",
            get(list_devices)
                .post(create_device)
                .put(update_device)
                .delete(delete_device),
        )
        .route("/devices/search", get(search_devices))
        .route("/devices/{id}", get(get_device))
}
