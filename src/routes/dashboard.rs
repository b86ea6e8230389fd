// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Dashboard summary route.

use crate::app::{AppState, RequireAuth};
use crate::models::dashboard::DashboardResponse;
use crate::services::dashboard::DashboardService;
use crate::services::error::ApiError;
use axum::{extract::State, routing::get, Json, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(summary_handler))
}

async fn summary_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<DashboardResponse>, ApiError> {
    DashboardService::new(state.pool.clone())
        .summary(&user)
        .await
        .map(Json)
}
