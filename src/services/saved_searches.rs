// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Saved-search snapshots: persist a named, pruned filter set per user and
//! restore it into a live search.

use crate::models::auth::AuthUser;
use crate::models::saved_search::SavedSearch;
use crate::models::search::SearchFilters;
use crate::services::error::ApiError;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const SAVED_SEARCH_COLUMNS: &str = "id, user_id, name, filters, created_at";

/// Store for saved searches. Snapshots are immutable after creation: the only
/// operations are save, list, apply, and delete.
pub struct SavedSearchStore {
    pool: PgPool,
}

impl SavedSearchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Save the current filters under a name. The snapshot is pruned before
    /// storage so it contains only meaningfully-set fields. Duplicate names
    /// are allowed and create distinct records.
    pub async fn save(
        &self,
        user: &AuthUser,
        name: &str,
        filters: &SearchFilters,
    ) -> Result<SavedSearch, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation(
                "Please provide a name for your search".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO saved_searches (id, user_id, name, filters) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SAVED_SEARCH_COLUMNS}"
        );

        let saved: SavedSearch = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(user.user_id)
            .bind(name)
            .bind(Json(filters.pruned()))
            .fetch_one(&self.pool)
            .await?;

        println!(
            "[SEARCH] Saved search created: id={}, user_id={}",
            saved.id, user.user_id
        );

        Ok(saved)
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<SavedSearch>, ApiError> {
        let sql = format!(
            "SELECT {SAVED_SEARCH_COLUMNS} FROM saved_searches \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as(&sql)
            .bind(user.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch one of the caller's saved searches. Ownership is part of the
    /// lookup, so another user's snapshot is indistinguishable from a missing
    /// one.
    pub async fn get(&self, user: &AuthUser, id: Uuid) -> Result<SavedSearch, ApiError> {
        let sql = format!(
            "SELECT {SAVED_SEARCH_COLUMNS} FROM saved_searches \
             WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Saved search not found".to_string()))
    }

    /// Delete one of the caller's saved searches. Destructive and
    /// irreversible; the route expects the client to have confirmed.
    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM saved_searches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Saved search not found".to_string()));
        }

        println!(
            "[SEARCH] Saved search deleted: id={}, user_id={}",
            id, user.user_id
        );

        Ok(())
    }
}

/// Restore a snapshot into a live filter set: the stored fields come back as
/// entered, and the target page is always reset to 1; a saved search never
/// resumes mid-pagination.
pub fn apply(saved: &SavedSearch) -> SearchFilters {
    let mut filters = saved.filters.0.clone();
    filters.page = Some("1".to_string());
    filters.limit = None;
    filters
}

/// Link that re-runs a saved search in the search view, carrying the snapshot
/// as a JSON-encoded `filters` query parameter.
pub fn apply_link(saved: &SavedSearch) -> Result<String, ApiError> {
    let json = serde_json::to_string(&saved.filters.0)
        .map_err(|e| ApiError::Storage(format!("Failed to serialize filters: {e}")))?;
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filters", &json)
        .finish();
    Ok(format!("/search?{query}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn saved_with(filters: SearchFilters) -> SavedSearch {
        SavedSearch {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            name: "Vilnius apartments".to_string(),
            filters: Json(filters),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_resets_page_to_one() {
        let saved = saved_with(SearchFilters {
            city: Some("Vilnius".to_string()),
            ..Default::default()
        });
        let filters = apply(&saved);
        assert_eq!(filters.page.as_deref(), Some("1"));
        assert_eq!(filters.city.as_deref(), Some("Vilnius"));
    }

    #[test]
    fn test_apply_then_prune_is_stable() {
        // prune -> apply -> prune must be a fixed point.
        let original = SearchFilters {
            property_type: Some("apartment".to_string()),
            min_price: Some("100000".to_string()),
            district: Some("".to_string()),
            sort_by: Some("price".to_string()),
            ..Default::default()
        };
        let stored = original.pruned();
        let saved = saved_with(stored.clone());
        let reapplied = apply(&saved);
        assert_eq!(reapplied.pruned(), stored);
    }

    #[test]
    fn test_apply_link_encodes_filters_as_json_param() {
        let saved = saved_with(SearchFilters {
            city: Some("Vilnius".to_string()),
            min_price: Some("100000".to_string()),
            ..Default::default()
        });
        let link = apply_link(&saved).unwrap();
        assert!(link.starts_with("/search?filters="));

        // The parameter must decode back into the same snapshot.
        let encoded = link.strip_prefix("/search?").unwrap();
        let (_, json) = url::form_urlencoded::parse(encoded.as_bytes())
            .find(|(k, _)| k == "filters")
            .unwrap();
        let decoded: SearchFilters = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, saved.filters.0);
    }
}
