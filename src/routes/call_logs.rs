// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Call log routes.

use crate::app::{AppState, RequireAuth};
use crate::models::auth::MessageResponse;
use crate::models::call_log::{CallLog, CallLogListResponse, CallLogPayload};
use crate::services::call_logs::CallLogStore;
use crate::services::error::ApiError;
use axum::{
    extract::{Path, State},
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
}

async fn list_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CallLogListResponse>, ApiError> {
    let call_logs = CallLogStore::new(state.pool.clone()).list(&user).await?;
    let count = call_logs.len();
    Ok(Json(CallLogListResponse { call_logs, count }))
}

async fn create_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<CallLogPayload>,
) -> Result<Json<CallLog>, ApiError> {
    CallLogStore::new(state.pool.clone())
        .create(&user, &payload)
        .await
        .map(Json)
}

async fn get_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<CallLog>, ApiError> {
    CallLogStore::new(state.pool.clone())
        .get(&user, id)
        .await
        .map(Json)
}

async fn update_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<CallLogPayload>,
) -> Result<Json<CallLog>, ApiError> {
    CallLogStore::new(state.pool.clone())
        .update(&user, id, &payload)
        .await
        .map(Json)
}

async fn delete_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    CallLogStore::new(state.pool.clone()).delete(&user, id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Call log deleted".to_string(),
    }))
}
