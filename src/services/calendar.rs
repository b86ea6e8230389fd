// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Calendar events, scoped to the owning broker.

use crate::models::auth::AuthUser;
use crate::models::calendar::{CalendarEvent, CalendarEventPayload};
use crate::services::error::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, broker_id, client_id, property_id, event_type, title, \
     description, start_time, end_time, reminder, created_at, updated_at";

pub struct CalendarStore {
    pool: PgPool,
}

impl CalendarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        payload: &CalendarEventPayload,
    ) -> Result<CalendarEvent, ApiError> {
        payload.validate().map_err(ApiError::Validation)?;

        let sql = format!(
            "INSERT INTO calendar_events (id, broker_id, client_id, property_id, event_type, \
             title, description, start_time, end_time, reminder) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {EVENT_COLUMNS}"
        );
        let event: CalendarEvent = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(user.user_id)
            .bind(payload.client_id)
            .bind(payload.property_id)
            .bind(&payload.event_type)
            .bind(payload.title.trim())
            .bind(&payload.description)
            .bind(payload.start_time)
            .bind(payload.end_time)
            .bind(payload.reminder)
            .fetch_one(&self.pool)
            .await?;
        Ok(event)
    }

    /// Events in chronological order, optionally bounded to a time window.
    pub async fn list(
        &self,
        user: &AuthUser,
        from: Option<chrono::DateTime<chrono::Utc>>,
        to: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Vec<CalendarEvent>, ApiError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events \
             WHERE broker_id = $1 \
             AND ($2::timestamptz IS NULL OR start_time >= $2) \
             AND ($3::timestamptz IS NULL OR start_time < $3) \
             ORDER BY start_time"
        );
        let rows = sqlx::query_as(&sql)
            .bind(user.user_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> Result<CalendarEvent, ApiError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = $1 AND broker_id = $2"
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Calendar event not found".to_string()))
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        payload: &CalendarEventPayload,
    ) -> Result<CalendarEvent, ApiError> {
        payload.validate().map_err(ApiError::Validation)?;

        let sql = format!(
            "UPDATE calendar_events SET client_id = $1, property_id = $2, event_type = $3, \
             title = $4, description = $5, start_time = $6, end_time = $7, reminder = $8, \
             updated_at = now() \
             WHERE id = $9 AND broker_id = $10 \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as(&sql)
            .bind(payload.client_id)
            .bind(payload.property_id)
            .bind(&payload.event_type)
            .bind(payload.title.trim())
            .bind(&payload.description)
            .bind(payload.start_time)
            .bind(payload.end_time)
            .bind(payload.reminder)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Calendar event not found".to_string()))
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND broker_id = $2")
            .bind(id)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Calendar event not found".to_string()));
        }
        Ok(())
    }
}
