// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Call log entries, scoped to the owning broker. A `reminder_at` in the
//! future is picked up by the reminder worker once due.

use crate::models::auth::AuthUser;
use crate::models::call_log::{CallLog, CallLogPayload};
use crate::services::error::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

const CALL_LOG_COLUMNS: &str = "id, broker_id, client_id, property_id, description, call_time, \
     duration_minutes, outcome, reminder_at, reminder_sent, created_at, updated_at";

pub struct CallLogStore {
    pool: PgPool,
}

impl CallLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn validate(payload: &CallLogPayload) -> Result<(), ApiError> {
        if payload.description.trim().is_empty() {
            return Err(ApiError::Validation(
                "Call description must not be empty".to_string(),
            ));
        }
        if let Some(duration) = payload.duration_minutes {
            if duration < 0 {
                return Err(ApiError::Validation(
                    "duration_minutes must not be negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        payload: &CallLogPayload,
    ) -> Result<CallLog, ApiError> {
        Self::validate(payload)?;

        let sql = format!(
            "INSERT INTO call_logs (id, broker_id, client_id, property_id, description, \
             call_time, duration_minutes, outcome, reminder_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {CALL_LOG_COLUMNS}"
        );
        let log: CallLog = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(user.user_id)
            .bind(payload.client_id)
            .bind(payload.property_id)
            .bind(payload.description.trim())
            .bind(payload.call_time)
            .bind(payload.duration_minutes)
            .bind(&payload.outcome)
            .bind(payload.reminder_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(log)
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<CallLog>, ApiError> {
        let sql = format!(
            "SELECT {CALL_LOG_COLUMNS} FROM call_logs \
             WHERE broker_id = $1 ORDER BY call_time DESC"
        );
        let rows = sqlx::query_as(&sql)
            .bind(user.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> Result<CallLog, ApiError> {
        let sql =
            format!("SELECT {CALL_LOG_COLUMNS} FROM call_logs WHERE id = $1 AND broker_id = $2");
        sqlx::query_as(&sql)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Call log not found".to_string()))
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        payload: &CallLogPayload,
    ) -> Result<CallLog, ApiError> {
        Self::validate(payload)?;

        // Editing the reminder re-arms it.
        let sql = format!(
            "UPDATE call_logs SET client_id = $1, property_id = $2, description = $3, \
             call_time = $4, duration_minutes = $5, outcome = $6, reminder_at = $7, \
             reminder_sent = CASE WHEN reminder_at IS DISTINCT FROM $7 THEN false \
             ELSE reminder_sent END, \
             updated_at = now() \
             WHERE id = $8 AND broker_id = $9 \
             RETURNING {CALL_LOG_COLUMNS}"
        );
        sqlx::query_as(&sql)
            .bind(payload.client_id)
            .bind(payload.property_id)
            .bind(payload.description.trim())
            .bind(payload.call_time)
            .bind(payload.duration_minutes)
            .bind(&payload.outcome)
            .bind(payload.reminder_at)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Call log not found".to_string()))
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM call_logs WHERE id = $1 AND broker_id = $2")
            .bind(id)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Call log not found".to_string()));
        }
        Ok(())
    }
}
