// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::SearchFilters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// A named, user-owned filter snapshot. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SavedSearch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[schema(value_type = SearchFilters)]
    pub filters: Json<SearchFilters>,
    pub created_at: DateTime<Utc>,
}

/// Request to save the current search under a name.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveSearchRequest {
    pub name: String,
    pub filters: SearchFilters,
}

/// Response for listing a user's saved searches.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavedSearchListResponse {
    pub saved_searches: Vec<SavedSearch>,
    pub count: usize,
}

/// Result of applying a saved search: the restored filter set (page reset to
/// 1), a link that re-runs it in the search view, and the freshly executed
/// results.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplySavedSearchResponse {
    pub filters: SearchFilters,
    pub link: String,
    pub results: crate::models::search::SearchResponse,
}

/// Response after deleting a saved search.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteSavedSearchResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}
