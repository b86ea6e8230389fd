// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Direct messaging between brokers. Poll-based: fetching a conversation
//! returns both directions and marks the partner's messages as read.

use crate::models::auth::AuthUser;
use crate::models::message::{Message, PartnerInfo};
use crate::services::error::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_COLUMNS: &str =
    "id, sender_id, receiver_id, property_id, content, is_read, sent_at";

pub struct MessageStore {
    pool: PgPool,
}

impl MessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All other brokers, as potential conversation partners.
    pub async fn list_partners(&self, user: &AuthUser) -> Result<Vec<PartnerInfo>, ApiError> {
        let rows = sqlx::query_as(
            "SELECT id, name, email, profile_picture FROM users \
             WHERE id <> $1 ORDER BY name NULLS LAST, email",
        )
        .bind(user.user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Both directions of the conversation, oldest first. The partner's
    /// unread messages to the caller are marked read in the same call, so a
    /// subsequent poll reflects the read state.
    pub async fn conversation(
        &self,
        user: &AuthUser,
        partner_id: Uuid,
    ) -> Result<Vec<Message>, ApiError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) \
                OR (sender_id = $2 AND receiver_id = $1) \
             ORDER BY sent_at ASC"
        );
        let messages: Vec<Message> = sqlx::query_as(&sql)
            .bind(user.user_id)
            .bind(partner_id)
            .fetch_all(&self.pool)
            .await?;

        sqlx::query(
            "UPDATE messages SET is_read = true \
             WHERE receiver_id = $1 AND sender_id = $2 AND is_read = false",
        )
        .bind(user.user_id)
        .bind(partner_id)
        .execute(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn send(
        &self,
        user: &AuthUser,
        receiver_id: Uuid,
        content: &str,
        property_id: Option<Uuid>,
    ) -> Result<Message, ApiError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::Validation(
                "Message content must not be empty".to_string(),
            ));
        }
        if receiver_id == user.user_id {
            return Err(ApiError::Validation(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO messages (id, sender_id, receiver_id, property_id, content) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let message: Message = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(user.user_id)
            .bind(receiver_id)
            .bind(property_id)
            .bind(content)
            .fetch_one(&self.pool)
            .await?;
        Ok(message)
    }

    /// Count of unread messages addressed to the caller.
    pub async fn unread_count(&self, user: &AuthUser) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
