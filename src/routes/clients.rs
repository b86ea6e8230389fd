// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! CRM client routes.

use crate::app::{AppState, RequireAuth};
use crate::models::auth::MessageResponse;
use crate::models::client::{Client, ClientListResponse, ClientPayload};
use crate::services::clients::ClientStore;
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
) -> Result<Json<ClientListResponse>, ApiError> {
    let clients = ClientStore::new(state.pool.clone()).list(&user).await?;
    let count = clients.len();
    Ok(Json(ClientListResponse { clients, count }))
}

async fn create_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<Client>, ApiError> {
    ClientStore::new(state.pool.clone())
        .create(&user, &payload)
        .await
        .map(Json)
}

async fn get_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, ApiError> {
    ClientStore::new(state.pool.clone())
        .get(&user, id)
        .await
        .map(Json)
}

async fn update_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<Client>, ApiError> {
    ClientStore::new(state.pool.clone())
        .update(&user, id, &payload)
        .await
        .map(Json)
}

async fn delete_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    ClientStore::new(state.pool.clone()).delete(&user, id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Client deleted".to_string(),
    }))
}
