// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A direct message between two brokers.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub property_id: Option<Uuid>,
    pub content: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}

/// Request to send a message to another broker.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Uuid>,
}

/// Both directions of a conversation, oldest first. Fetching a conversation
/// marks the partner's messages to the caller as read.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationResponse {
    pub messages: Vec<Message>,
    pub count: usize,
}

/// A potential conversation partner.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PartnerInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub profile_picture: Option<String>,
}

/// Response for listing conversation partners.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnerListResponse {
    pub partners: Vec<PartnerInfo>,
    pub count: usize,
}
