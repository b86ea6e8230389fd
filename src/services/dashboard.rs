// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Dashboard summaries: individual brokers see their own active-listing
//! count; company users see the agency's count plus the team roster.

use crate::models::auth::{AuthUser, UserRole};
use crate::models::dashboard::{DashboardResponse, TeamMember};
use crate::services::error::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self, user: &AuthUser) -> Result<DashboardResponse, ApiError> {
        match (user.role, user.agency_id) {
            (UserRole::Company, Some(agency_id)) => self.company_summary(user, agency_id).await,
            _ => self.individual_summary(user).await,
        }
    }

    async fn individual_summary(&self, user: &AuthUser) -> Result<DashboardResponse, ApiError> {
        let active_listings: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM properties WHERE broker_id = $1 AND status = 'active'",
        )
        .bind(user.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardResponse {
            role: user.role.as_str().to_string(),
            active_listings,
            agency_active_listings: None,
            team: None,
        })
    }

    async fn company_summary(
        &self,
        user: &AuthUser,
        agency_id: Uuid,
    ) -> Result<DashboardResponse, ApiError> {
        let own_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM properties WHERE broker_id = $1 AND status = 'active'",
        )
        .bind(user.user_id)
        .fetch_one(&self.pool);

        let agency_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM properties WHERE agency_id = $1 AND status = 'active'",
        )
        .bind(agency_id)
        .fetch_one(&self.pool);

        let team = sqlx::query_as::<_, TeamMember>(
            "SELECT id, name, email FROM users WHERE agency_id = $1 ORDER BY name NULLS LAST",
        )
        .bind(agency_id)
        .fetch_all(&self.pool);

        let (active_listings, agency_active_listings, team) =
            futures::try_join!(own_count, agency_count, team)?;

        Ok(DashboardResponse {
            role: user.role.as_str().to_string(),
            active_listings,
            agency_active_listings: Some(agency_active_listings),
            team: Some(team),
        })
    }
}
