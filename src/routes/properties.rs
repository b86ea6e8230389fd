// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing CRUD and image upload routes.

use crate::app::{AppState, RequireAuth};
use crate::models::auth::MessageResponse;
use crate::models::property::{
    ImageUploadResponse, Property, PropertyListResponse, PropertyPayload,
};
use crate::services::error::ApiError;
use crate::services::properties::PropertyStore;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    http::HeaderMap,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/", post(create_handler))
        .route("/{id}", get(get_handler))
        .route("/{id}", put(update_handler))
        .route("/{id}", delete(delete_handler))
        .route("/{id}/images", post(upload_image_handler))
}

/// GET /api/properties - The caller's own listings.
async fn list_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<PropertyListResponse>, ApiError> {
    let properties = PropertyStore::new(state.pool.clone())
        .list_for_broker(&user)
        .await?;
    let count = properties.len();
    Ok(Json(PropertyListResponse { properties, count }))
}

/// POST /api/properties - Create a listing owned by the caller.
async fn create_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<PropertyPayload>,
) -> Result<Json<Property>, ApiError> {
    PropertyStore::new(state.pool.clone())
        .create(&user, &payload)
        .await
        .map(Json)
}

/// GET /api/properties/{id} - Listing details. Public.
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    PropertyStore::new(state.pool.clone()).get(id).await.map(Json)
}

/// PUT /api/properties/{id} - Replace a listing. Owner or agency only.
async fn update_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertyPayload>,
) -> Result<Json<Property>, ApiError> {
    PropertyStore::new(state.pool.clone())
        .update(&user, id, &payload)
        .await
        .map(Json)
}

/// DELETE /api/properties/{id} - Remove a listing. Owner or agency only.
async fn delete_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    PropertyStore::new(state.pool.clone())
        .delete(&user, id)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Listing deleted".to_string(),
    }))
}

/// POST /api/properties/{id}/images - Upload an image and attach its key to
/// the listing. Body is the raw image; the content type header selects the
/// stored format.
async fn upload_image_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImageUploadResponse>, ApiError> {
    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| ApiError::Storage("Image storage is not configured".to_string()))?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Validation("Content-Type header is required".to_string()))?;

    if !content_type.starts_with("image/") {
        return Err(ApiError::Validation(format!(
            "Expected an image content type, got '{content_type}'"
        )));
    }

    let (key, url) = storage
        .upload_image(&body, content_type)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    PropertyStore::new(state.pool.clone())
        .attach_image(&user, id, &key)
        .await?;

    Ok(Json(ImageUploadResponse {
        success: true,
        key,
        url,
    }))
}
