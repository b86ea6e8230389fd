// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Background reminder worker.
//!
//! Polls for call logs whose `reminder_at` has passed and emails the owning
//! broker. Reminders are claimed by flipping `reminder_sent` before sending,
//! so a crash mid-send can never deliver twice; a failed send un-claims the
//! reminder and a later poll retries it.

use crate::services::email::EmailService;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

/// Upper bound on reminders claimed per poll.
const MAX_BATCH: i64 = 20;

#[derive(Debug, sqlx::FromRow)]
struct DueReminder {
    id: Uuid,
    broker_id: Uuid,
    description: String,
    call_time: DateTime<Utc>,
}

/// Worker that continuously delivers due call-log reminders.
pub struct ReminderProcessor {
    pool: PgPool,
    email: Arc<EmailService>,
    poll_interval: Duration,
}

impl ReminderProcessor {
    pub fn new(pool: PgPool, email: Arc<EmailService>, poll_interval: Duration) -> Self {
        Self {
            pool,
            email,
            poll_interval,
        }
    }

    /// Run the poll loop forever.
    pub async fn start(&self) {
        println!("[REMINDER] Reminder processor started");

        loop {
            match self.process_due_reminders().await {
                Ok(0) => sleep(self.poll_interval).await,
                Ok(sent) => {
                    println!("[REMINDER] Delivered {sent} reminder(s)");
                }
                Err(e) => {
                    eprintln!("[REMINDER] Error processing reminders: {e}");
                    sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Claim and deliver one batch of due reminders.
    /// Returns the number of reminders delivered.
    pub async fn process_due_reminders(&self) -> Result<usize> {
        // Claim first: whoever flips reminder_sent owns delivery.
        let claimed: Vec<DueReminder> = sqlx::query_as(
            "UPDATE call_logs SET reminder_sent = true \
             WHERE id IN ( \
                 SELECT id FROM call_logs \
                 WHERE reminder_at IS NOT NULL \
                   AND reminder_at <= now() \
                   AND reminder_sent = false \
                 ORDER BY reminder_at \
                 LIMIT $1 \
             ) \
             RETURNING id, broker_id, description, call_time",
        )
        .bind(MAX_BATCH)
        .fetch_all(&self.pool)
        .await?;

        let mut sent = 0;
        for reminder in claimed {
            match self.deliver(&reminder).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    eprintln!(
                        "[REMINDER] Failed to deliver reminder {}: {e}",
                        reminder.id
                    );
                    self.unclaim(reminder.id).await;
                }
            }
        }

        Ok(sent)
    }

    async fn deliver(&self, reminder: &DueReminder) -> Result<()> {
        let broker: (String, Option<String>) =
            sqlx::query_as("SELECT email, name FROM users WHERE id = $1")
                .bind(reminder.broker_id)
                .fetch_one(&self.pool)
                .await?;

        let (email, name) = broker;
        let broker_name = name.unwrap_or_else(|| email.split('@').next().unwrap_or("").to_string());
        let call_time = reminder.call_time.format("%Y-%m-%d %H:%M UTC").to_string();

        self.email
            .send_call_reminder(&email, &broker_name, &reminder.description, &call_time)
            .await
    }

    /// Release a claimed reminder after a failed send so a later poll
    /// retries it.
    async fn unclaim(&self, id: Uuid) {
        if let Err(e) = sqlx::query("UPDATE call_logs SET reminder_sent = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            eprintln!("[REMINDER] Failed to un-claim reminder {id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/estate_desk_test".to_string());
        PgPool::connect(&url).await.expect("connect test database")
    }

    #[tokio::test]
    #[ignore] // Requires Postgres and SMTP
    async fn test_no_due_reminders_is_a_no_op() {
        let config = crate::services::email::EmailConfig::from_env().unwrap();
        let email = Arc::new(EmailService::new(config).unwrap());
        let processor = ReminderProcessor::new(test_pool().await, email, Duration::from_secs(60));

        // On an empty/fresh database, nothing should be claimed or sent.
        let sent = processor.process_due_reminders().await.unwrap();
        assert_eq!(sent, 0);
    }
}
