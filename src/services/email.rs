// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::env;

/// Configuration for the email service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_tls: bool,
    pub from_email: String,
    pub from_name: String,
    pub app_base_url: String,
}

impl EmailConfig {
    /// Load email configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").context("SMTP_HOST must be set")?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid port number")?,
            smtp_username: env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
            smtp_password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            smtp_tls: env::var("SMTP_TLS").map(|v| v == "true").unwrap_or(true),
            from_email: env::var("SMTP_FROM_EMAIL").context("SMTP_FROM_EMAIL must be set")?,
            from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "EstateDesk".to_string()),
            app_base_url: env::var("APP_BASE_URL").context("APP_BASE_URL must be set")?,
        })
    }
}

/// Email template with simple variable substitution.
struct EmailTemplate {
    content: &'static str,
}

impl EmailTemplate {
    const fn new(content: &'static str) -> Self {
        Self { content }
    }

    fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut result = self.content.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

// Email templates loaded at compile time
const CALL_REMINDER_TEMPLATE: EmailTemplate =
    EmailTemplate::new(include_str!("../../templates/emails/call_reminder.txt"));

/// Email service for sending reminder emails.
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
    config: EmailConfig,
}

impl EmailService {
    /// Create a new email service with the given configuration.
    pub fn new(config: EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .context("Failed to create SMTP relay")?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .context("Invalid from email address")?;

        Ok(Self {
            transport,
            from_mailbox,
            config,
        })
    }

    /// Send a follow-up reminder for a logged call.
    pub async fn send_call_reminder(
        &self,
        to_email: &str,
        broker_name: &str,
        description: &str,
        call_time: &str,
    ) -> Result<()> {
        let call_log_link = format!("{}/dashboard/calls", self.config.app_base_url);

        let body = CALL_REMINDER_TEMPLATE.render(&[
            ("broker_name", broker_name),
            ("description", description),
            ("call_time", call_time),
            ("call_log_link", &call_log_link),
        ]);

        self.send_email(to_email, "Call follow-up reminder", &body)
            .await
    }

    /// Send an email.
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let to_mailbox: Mailbox = to.parse().context("Invalid recipient email address")?;

        let email = Message::builder()
            .from(self.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .body(body.to_string())
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_render() {
        let template = EmailTemplate::new("Hello {{name}}, your code is {{code}}.");
        let result = template.render(&[("name", "Alice"), ("code", "12345")]);
        assert_eq!(result, "Hello Alice, your code is 12345.");
    }

    #[test]
    fn test_template_render_missing_var() {
        let template = EmailTemplate::new("Hello {{name}}, welcome!");
        let result = template.render(&[]);
        assert_eq!(result, "Hello {{name}}, welcome!");
    }

    #[test]
    fn test_call_reminder_template_loads() {
        let result = CALL_REMINDER_TEMPLATE.render(&[
            ("broker_name", "Alice"),
            ("description", "Discuss viewing on Friday"),
            ("call_time", "2026-08-01 10:00"),
            ("call_log_link", "https://example.com/dashboard/calls"),
        ]);
        assert!(result.contains("Alice"));
        assert!(result.contains("Discuss viewing on Friday"));
        assert!(result.contains("https://example.com/dashboard/calls"));
    }
}
