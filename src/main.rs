// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use estate_desk::app::{create_router, AppState, VERSION};
use estate_desk::services::auth::{AuthConfig, AuthService};
use estate_desk::services::email::{EmailConfig, EmailService};
use estate_desk::services::reminders::ReminderProcessor;
use estate_desk::services::storage::{S3Config, StorageClient};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let database_url =
        env::var("DATABASE_URL").expect("DATABASE_URL environment variable must be set");

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a valid port number");

    let max_connections: u32 = env::var("DB_MAX_CONNECTIONS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .expect("DB_MAX_CONNECTIONS must be a valid number");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    println!("Connected to Postgres, migrations applied");

    // Image storage is optional: without S3 configuration the API runs with
    // uploads disabled.
    let storage = match env::var("S3_ENDPOINT") {
        Ok(_) => match S3Config::from_env() {
            Ok(config) => match StorageClient::new(config).await {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    eprintln!("Failed to connect to S3 storage: {e}");
                    eprintln!("Continuing without image uploads");
                    None
                }
            },
            Err(e) => {
                eprintln!("Incomplete S3 configuration: {e}");
                eprintln!("Continuing without image uploads");
                None
            }
        },
        Err(_) => None,
    };

    // The reminder worker needs SMTP; without it reminders stay queued.
    if let Ok(email_config) = EmailConfig::from_env() {
        match EmailService::new(email_config) {
            Ok(email) => {
                let poll_interval_secs: u64 = env::var("REMINDER_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .expect("REMINDER_POLL_INTERVAL_SECS must be a valid number");

                let processor = ReminderProcessor::new(
                    pool.clone(),
                    Arc::new(email),
                    Duration::from_secs(poll_interval_secs),
                );
                tokio::spawn(async move {
                    processor.start().await;
                });
            }
            Err(e) => {
                eprintln!("Failed to create email service: {e}");
                eprintln!("Continuing without the reminder worker");
            }
        }
    } else {
        println!("SMTP not configured, reminder worker disabled");
    }

    let auth_config = AuthConfig::from_env();
    let session_max_age_days = auth_config.session_max_age_days;
    let auth = Arc::new(AuthService::new(pool.clone(), auth_config));

    let state = AppState {
        pool,
        auth,
        storage,
        session_max_age_days,
    };

    let app = create_router(state);

    // Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    println!("estate-desk v{} listening on {}", VERSION, addr);

    axum::serve(listener, app).await.unwrap();
}
