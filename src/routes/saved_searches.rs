// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Saved-search routes: save, list, apply, delete.

use crate::app::{AppState, RequireAuth};
use crate::models::saved_search::{
    ApplySavedSearchResponse, DeleteSavedSearchResponse, SaveSearchRequest, SavedSearch,
    SavedSearchListResponse,
};
use crate::services::error::ApiError;
use crate::services::properties::PropertyStore;
use crate::services::saved_searches::{self, SavedSearchStore};
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/", post(save_handler))
        .route("/{id}", delete(delete_handler))
        .route("/{id}/apply", get(apply_handler))
}

/// GET /api/saved-searches - The caller's saved searches, newest first.
async fn list_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SavedSearchListResponse>, ApiError> {
    let saved_searches = SavedSearchStore::new(state.pool.clone()).list(&user).await?;
    let count = saved_searches.len();
    Ok(Json(SavedSearchListResponse {
        saved_searches,
        count,
    }))
}

/// POST /api/saved-searches - Save the current filters under a name.
async fn save_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<SaveSearchRequest>,
) -> Result<Json<SavedSearch>, ApiError> {
    SavedSearchStore::new(state.pool.clone())
        .save(&user, &payload.name, &payload.filters)
        .await
        .map(Json)
}

/// GET /api/saved-searches/{id}/apply - Restore the snapshot and execute it
/// as a fresh search (always from page 1).
async fn apply_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplySavedSearchResponse>, ApiError> {
    let saved = SavedSearchStore::new(state.pool.clone()).get(&user, id).await?;

    let filters = saved_searches::apply(&saved);
    let link = saved_searches::apply_link(&saved)?;
    let results = PropertyStore::new(state.pool.clone()).search(&filters).await?;

    Ok(Json(ApplySavedSearchResponse {
        filters,
        link,
        results,
    }))
}

/// DELETE /api/saved-searches/{id} - Delete one of the caller's saved
/// searches. Irreversible; the client confirms before calling.
async fn delete_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSavedSearchResponse>, ApiError> {
    SavedSearchStore::new(state.pool.clone())
        .delete(&user, id)
        .await?;
    Ok(Json(DeleteSavedSearchResponse {
        success: true,
        message: "Saved search deleted".to_string(),
        id,
    }))
}
