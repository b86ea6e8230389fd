// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Calendar event routes.

use crate::app::{AppState, RequireAuth};
use crate::models::auth::MessageResponse;
use crate::models::calendar::{CalendarEvent, CalendarEventListResponse, CalendarEventPayload};
use crate::services::calendar::CalendarStore;
use crate::services::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/", post(create_handler))
        .route("/{id}", get(get_handler))
        .route("/{id}", put(update_handler))
        .route("/{id}", delete(delete_handler))
}

/// Optional time window for the event list.
#[derive(Debug, Default, Deserialize)]
struct EventWindow {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

async fn list_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(window): Query<EventWindow>,
) -> Result<Json<CalendarEventListResponse>, ApiError> {
    let events = CalendarStore::new(state.pool.clone())
        .list(&user, window.from, window.to)
        .await?;
    let count = events.len();
    Ok(Json(CalendarEventListResponse { events, count }))
}

async fn create_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<CalendarEventPayload>,
) -> Result<Json<CalendarEvent>, ApiError> {
    CalendarStore::new(state.pool.clone())
        .create(&user, &payload)
        .await
        .map(Json)
}

async fn get_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarEvent>, ApiError> {
    CalendarStore::new(state.pool.clone())
        .get(&user, id)
        .await
        .map(Json)
}

async fn update_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<CalendarEventPayload>,
) -> Result<Json<CalendarEvent>, ApiError> {
    CalendarStore::new(state.pool.clone())
        .update(&user, id, &payload)
        .await
        .map(Json)
}

async fn delete_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    CalendarStore::new(state.pool.clone()).delete(&user, id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Calendar event deleted".to_string(),
    }))
}
