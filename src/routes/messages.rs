// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Direct-messaging routes (poll-based).

use crate::app::{AppState, RequireAuth};
use crate::models::message::{
    ConversationResponse, Message, PartnerListResponse, SendMessageRequest,
};
use crate::services::error::ApiError;
use crate::services::messages::MessageStore;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_handler))
        .route("/partners", get(partners_handler))
        .route("/conversation/{partner_id}", get(conversation_handler))
        .route("/unread-count", get(unread_count_handler))
}

/// GET /api/messages/partners - All other brokers.
async fn partners_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<PartnerListResponse>, ApiError> {
    let partners = MessageStore::new(state.pool.clone())
        .list_partners(&user)
        .await?;
    let count = partners.len();
    Ok(Json(PartnerListResponse { partners, count }))
}

/// GET /api/messages/conversation/{partner_id} - Both directions, oldest
/// first; marks the partner's messages to the caller as read.
async fn conversation_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let messages = MessageStore::new(state.pool.clone())
        .conversation(&user, partner_id)
        .await?;
    let count = messages.len();
    Ok(Json(ConversationResponse { messages, count }))
}

/// POST /api/messages - Send a message.
async fn send_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    MessageStore::new(state.pool.clone())
        .send(&user, payload.receiver_id, &payload.content, payload.property_id)
        .await
        .map(Json)
}

#[derive(Debug, Serialize)]
struct UnreadCountResponse {
    unread: i64,
}

/// GET /api/messages/unread-count - Unread messages addressed to the caller.
async fn unread_count_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread = MessageStore::new(state.pool.clone())
        .unread_count(&user)
        .await?;
    Ok(Json(UnreadCountResponse { unread }))
}
