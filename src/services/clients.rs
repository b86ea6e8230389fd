// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! CRM client records, always scoped to the owning broker.

use crate::models::auth::AuthUser;
use crate::models::client::{Client, ClientPayload};
use crate::services::error::ApiError;
use crate::services::logging::anonymize_phone;
use sqlx::PgPool;
use uuid::Uuid;

const CLIENT_COLUMNS: &str = "id, broker_id, name, phone, email, notes, created_at, updated_at";

pub struct ClientStore {
    pool: PgPool,
}

impl ClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &AuthUser, payload: &ClientPayload) -> Result<Client, ApiError> {
        if payload.name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Client name must not be empty".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO clients (id, broker_id, name, phone, email, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CLIENT_COLUMNS}"
        );
        let client: Client = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(user.user_id)
            .bind(payload.name.trim())
            .bind(&payload.phone)
            .bind(&payload.email)
            .bind(&payload.notes)
            .fetch_one(&self.pool)
            .await?;

        println!(
            "[CRM] Client created: id={}, broker_id={}, phone={}",
            client.id,
            user.user_id,
            client
                .phone
                .as_deref()
                .map(anonymize_phone)
                .unwrap_or_else(|| "-".to_string())
        );

        Ok(client)
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<Client>, ApiError> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE broker_id = $1 ORDER BY name"
        );
        let rows = sqlx::query_as(&sql)
            .bind(user.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> Result<Client, ApiError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND broker_id = $2");
        sqlx::query_as(&sql)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        payload: &ClientPayload,
    ) -> Result<Client, ApiError> {
        if payload.name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Client name must not be empty".to_string(),
            ));
        }

        let sql = format!(
            "UPDATE clients SET name = $1, phone = $2, email = $3, notes = $4, \
             updated_at = now() \
             WHERE id = $5 AND broker_id = $6 \
             RETURNING {CLIENT_COLUMNS}"
        );
        sqlx::query_as(&sql)
            .bind(payload.name.trim())
            .bind(&payload.phone)
            .bind(&payload.email)
            .bind(&payload.notes)
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND broker_id = $2")
            .bind(id)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Client not found".to_string()));
        }
        Ok(())
    }
}
