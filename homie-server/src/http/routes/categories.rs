//! Category endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;

use super::{CreatedResponse, IdRequest, MessageResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidId};
use crate::http::server::AppState;
use crate::models::{required_id, Category, CategoryName, LooseNumber};

/// Create category request
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
}

/// Update category request
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: Option<LooseNumber>,
    pub name: Option<String>,
}

/// GET /categories - list all categories with device counts
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.categories.list().await?;
    Ok(Json(categories))
}

/// GET /categories/{id} - get a single category
async fn get_category(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Category>, ApiError> {
    let category = state.categories.get(id).await?;
    Ok(Json(category))
}

/// POST /categories - create a category
async fn create_category(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let name = CategoryName::parse(req.name.as_deref())?;
    let id = state.categories.create(name).await?;
    tracing::info!(id, "category created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "category created",
        }),
    ))
}

/// PUT /categories - rename a category
async fn update_category(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<UpdateCategoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = required_id(req.id.as_ref(), "id")?;
    let name = CategoryName::parse(req.name.as_deref())?;
    state.categories.update(id, name).await?;

    Ok(Json(MessageResponse {
        message: "category updated",
    }))
}

/// DELETE /categories - delete a category without linked devices
async fn delete_category(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<IdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = required_id(req.id.as_ref(), "id")?;
    state.categories.delete(id).await?;
    tracing::info!(id, "category deleted");

    Ok(Json(MessageResponse {
        message: "category deleted",
    }))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/categories",
            get(list_categories)
                .post(create_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/{id}", get(get_category))
}
