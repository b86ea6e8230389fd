// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEventType {
    Appointment,
    Viewing,
    Task,
}

impl CalendarEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarEventType::Appointment => "appointment",
            CalendarEventType::Viewing => "viewing",
            CalendarEventType::Task => "task",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appointment" => Some(CalendarEventType::Appointment),
            "viewing" => Some(CalendarEventType::Viewing),
            "task" => Some(CalendarEventType::Task),
            _ => None,
        }
    }
}

/// A calendar entry owned by one broker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub broker_id: Uuid,
    pub client_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub event_type: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reminder: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or replacing a calendar event.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CalendarEventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Uuid>,
    pub event_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub reminder: bool,
}

impl CalendarEventPayload {
    pub fn validate(&self) -> Result<(), String> {
        if CalendarEventType::parse(&self.event_type).is_none() {
            return Err(format!(
                "event_type must be one of appointment, viewing, task (got '{}')",
                self.event_type
            ));
        }
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.start_time >= self.end_time {
            return Err("start_time must be before end_time".to_string());
        }
        Ok(())
    }
}

/// Response for listing a broker's calendar events.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalendarEventListResponse {
    pub events: Vec<CalendarEvent>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload(start_offset_mins: i64, end_offset_mins: i64) -> CalendarEventPayload {
        let base = Utc::now();
        CalendarEventPayload {
            client_id: None,
            property_id: None,
            event_type: "viewing".to_string(),
            title: "Apartment viewing".to_string(),
            description: None,
            start_time: base + Duration::minutes(start_offset_mins),
            end_time: base + Duration::minutes(end_offset_mins),
            reminder: false,
        }
    }

    #[test]
    fn test_event_type_roundtrip() {
        for t in [
            CalendarEventType::Appointment,
            CalendarEventType::Viewing,
            CalendarEventType::Task,
        ] {
            assert_eq!(CalendarEventType::parse(t.as_str()), Some(t));
        }
        assert_eq!(CalendarEventType::parse("meeting"), None);
    }

    #[test]
    fn test_valid_event_passes() {
        assert!(payload(0, 30).validate().is_ok());
    }

    #[test]
    fn test_start_after_end_rejected() {
        assert!(payload(30, 0).validate().is_err());
        assert!(payload(10, 10).validate().is_err());
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let mut p = payload(0, 30);
        p.event_type = "party".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut p = payload(0, 30);
        p.title = "   ".to_string();
        assert!(p.validate().is_err());
    }
}
