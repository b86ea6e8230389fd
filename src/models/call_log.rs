// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A logged client call, optionally carrying a follow-up reminder consumed by
/// the reminder worker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CallLog {
    pub id: Uuid,
    pub broker_id: Uuid,
    pub client_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub description: String,
    pub call_time: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub outcome: Option<String>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or replacing a call log entry.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CallLogPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Uuid>,
    pub description: String,
    pub call_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<DateTime<Utc>>,
}

/// Response for listing a broker's call logs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CallLogListResponse {
    pub call_logs: Vec<CallLog>,
    pub count: usize,
}
