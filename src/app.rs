// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, identity extractors, core handlers, and router
//! construction.
//!
//! This module is `pub` so that integration tests can build a test router
//! directly without starting the full binary.

use crate::models::auth::AuthUser;
use crate::models::search::{SearchFilters, SearchResponse};
use crate::models::version::VersionResponse;
use crate::routes;
use crate::services::auth::AuthService;
use crate::services::auth_middleware::extract_session_token;
use crate::services::error::ApiError;
use crate::services::properties::PropertyStore;
use crate::services::storage::StorageClient;
use axum::{
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_cookies::{CookieManagerLayer, Cookies};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `ESTATE_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("ESTATE_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: Arc<AuthService>,
    /// Image storage; `None` disables uploads (dev / tests).
    pub storage: Option<Arc<StorageClient>>,
    pub session_max_age_days: u64,
}

// ---------------------------------------------------------------------------
// Identity extractors
// ---------------------------------------------------------------------------

/// The caller's identity: a validated session user, or anonymous.
///
/// Operations take this explicitly instead of reading ambient session state,
/// so they can be exercised without a live auth provider.
pub struct Identity(pub Option<AuthUser>);

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Storage("Failed to read request cookies".to_string()))?;

        let token = match extract_session_token(&cookies) {
            Some(t) => t,
            None => return Ok(Identity(None)),
        };

        let user = state.auth.validate_session(&token).await?;
        Ok(Identity(user))
    }
}

/// Extractor for operations that require an authenticated caller.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(user) = Identity::from_request_parts(parts, state).await?;
        user.map(RequireAuth)
            .ok_or(ApiError::Unauthorized("Authentication required"))
    }
}

// ---------------------------------------------------------------------------
// Core route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "estate-desk".to_string(),
        version: VERSION.to_string(),
    })
}

/// GET /api/search - the property search endpoint. Anonymous callers are
/// allowed; listings are public data.
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchFilters),
    responses(
        (status = 200, description = "One page of matching listings", body = SearchResponse),
        (status = 400, description = "Malformed filter value", body = crate::models::search::ErrorResponse),
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<SearchResponse>, ApiError> {
    let store = PropertyStore::new(state.pool.clone());
    store.search(&filters).await.map(Json)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(paths(search_handler))]
struct SearchApiDoc;

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    let mut openapi = routes::auth::AuthApiDoc::openapi();
    openapi.merge(SearchApiDoc::openapi());

    Router::new()
        .route("/version", get(version_handler))
        .route("/api/search", get(search_handler))
        .nest("/api/properties", routes::properties::router())
        .nest("/api/saved-searches", routes::saved_searches::router())
        .nest("/api/clients", routes::clients::router())
        .nest("/api/call-logs", routes::call_logs::router())
        .nest("/api/calendar", routes::calendar::router())
        .nest("/api/messages", routes::messages::router())
        .nest("/api/dashboard", routes::dashboard::router())
        .nest("/auth", routes::auth::router())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(CookieManagerLayer::new())
}
