// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A member of the caller's agency, shown on the company dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

/// Dashboard summary. Individual brokers get their own active-listing count;
/// company users get the agency count plus the team roster.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub role: String,
    pub active_listings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_active_listings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<TeamMember>>,
}
