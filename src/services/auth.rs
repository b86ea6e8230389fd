// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication service: password accounts and opaque session tokens.
//!
//! Session tokens are random 32-byte values; only their SHA-256 hash is
//! stored, so a leaked sessions table cannot be replayed. Passwords are
//! hashed with argon2id.

use crate::models::auth::{
    AuthUser, CorporateSignUpRequest, Session, SignUpRequest, UserProfile, UserRole,
};
use crate::services::error::ApiError;
use crate::services::logging::anonymize_email;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

const PROFILE_COLUMNS: &str =
    "id, email, role, agency_id, name, phone, profile_picture, created_at, updated_at";

const MIN_PASSWORD_LENGTH: usize = 8;

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in days
    pub session_max_age_days: u64,
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            session_max_age_days: env::var("SESSION_MAX_AGE_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }
}

/// Authentication service.
pub struct AuthService {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    // ========== Token Generation ==========

    /// Generate a secure random token.
    /// Returns (raw_token, hash) - raw_token is sent to user, hash is stored in DB.
    pub fn generate_token() -> (String, String) {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw_token = hex::encode(bytes);
        let hash = Self::hash_token(&raw_token);
        (raw_token, hash)
    }

    /// Hash a token for storage.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    // ========== Password Hashing ==========

    /// Hash a plain password with argon2id.
    pub fn hash_password(password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| ApiError::Storage(format!("Failed to hash password: {e}")))
    }

    /// Verify a password against a stored argon2id hash.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
        if !email.contains('@') || email.trim().len() < 3 {
            return Err(ApiError::Validation("A valid email is required".to_string()));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }

    // ========== Account Creation ==========

    /// Create an individual broker account and sign it in.
    /// Returns the raw session token and the new profile.
    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<(String, UserProfile), ApiError> {
        Self::validate_credentials(&req.email, &req.password)?;
        let password_hash = Self::hash_password(&req.password)?;

        let sql = format!(
            "INSERT INTO users (id, email, password_hash, role, name) \
             VALUES ($1, $2, $3, 'individual', $4) \
             RETURNING {PROFILE_COLUMNS}"
        );
        let profile: UserProfile = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(req.email.trim().to_lowercase())
            .bind(&password_hash)
            .bind(&req.name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_email)?;

        println!(
            "[AUTH] New broker account: user_id={}, email={}",
            profile.id,
            anonymize_email(&profile.email)
        );

        let token = self.create_session(profile.id).await?;
        Ok((token, profile))
    }

    /// Create an agency and its first company account in one transaction,
    /// then sign the account in.
    pub async fn sign_up_corporate(
        &self,
        req: &CorporateSignUpRequest,
    ) -> Result<(String, UserProfile), ApiError> {
        Self::validate_credentials(&req.email, &req.password)?;
        if req.agency_name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Agency name must not be empty".to_string(),
            ));
        }
        let password_hash = Self::hash_password(&req.password)?;

        let mut tx = self.pool.begin().await?;

        let agency_id = Uuid::now_v7();
        sqlx::query("INSERT INTO agencies (id, name, contact_email) VALUES ($1, $2, $3)")
            .bind(agency_id)
            .bind(req.agency_name.trim())
            .bind(req.email.trim().to_lowercase())
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "INSERT INTO users (id, email, password_hash, role, agency_id, name) \
             VALUES ($1, $2, $3, 'company', $4, $5) \
             RETURNING {PROFILE_COLUMNS}"
        );
        let profile: UserProfile = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(req.email.trim().to_lowercase())
            .bind(&password_hash)
            .bind(agency_id)
            .bind(&req.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_email)?;

        tx.commit().await?;

        println!(
            "[AUTH] New agency account: user_id={}, email={}, agency_id={}",
            profile.id,
            anonymize_email(&profile.email),
            agency_id
        );

        let token = self.create_session(profile.id).await?;
        Ok((token, profile))
    }

    // ========== Sign In / Out ==========

    /// Verify credentials and create a session. Returns the raw session token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE email = $1")
                .bind(email.trim().to_lowercase())
                .fetch_optional(&self.pool)
                .await?;

        let (user_id, password_hash) = match row {
            Some(r) => r,
            None => {
                // Hash anyway so the response time doesn't reveal whether the
                // email exists.
                let _ = Self::hash_password(password);
                return Err(ApiError::Unauthorized("Invalid email or password"));
            }
        };

        if !Self::verify_password(password, &password_hash) {
            eprintln!(
                "[AUTH] Failed sign-in for {}",
                anonymize_email(email)
            );
            return Err(ApiError::Unauthorized("Invalid email or password"));
        }

        let token = self.create_session(user_id).await?;

        println!(
            "[AUTH] User signed in: user_id={}, email={}",
            user_id,
            anonymize_email(email)
        );

        Ok(token)
    }

    async fn create_session(&self, user_id: Uuid) -> Result<String, ApiError> {
        let (raw_token, token_hash) = Self::generate_token();
        let expires_at = Utc::now() + Duration::days(self.config.session_max_age_days as i64);

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(&token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(raw_token)
    }

    /// Sign out - invalidate the session.
    pub async fn sign_out(&self, session_token: &str) -> Result<(), ApiError> {
        let token_hash = Self::hash_token(session_token);
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ========== Session Validation ==========

    /// Validate a session token and return the caller's identity, or `None`
    /// for a missing/expired session.
    pub async fn validate_session(
        &self,
        session_token: &str,
    ) -> Result<Option<AuthUser>, ApiError> {
        let token_hash = Self::hash_token(session_token);

        let session: Option<Session> = sqlx::query_as(
            "SELECT token_hash, user_id, created_at, expires_at, last_active_at, \
             user_agent, ip_address \
             FROM sessions WHERE token_hash = $1",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        let session = match session {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            // Clean up the expired session.
            sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
                .bind(&token_hash)
                .execute(&self.pool)
                .await?;
            return Ok(None);
        }

        let user: Option<(String, String, Option<Uuid>)> =
            sqlx::query_as("SELECT email, role, agency_id FROM users WHERE id = $1")
                .bind(session.user_id)
                .fetch_optional(&self.pool)
                .await?;

        let (email, role, agency_id) = match user {
            Some(u) => u,
            None => return Ok(None),
        };

        // Update last active time (fire and forget).
        let _ = sqlx::query("UPDATE sessions SET last_active_at = now() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.pool)
            .await;

        Ok(Some(AuthUser {
            user_id: session.user_id,
            email,
            role: UserRole::parse(&role).unwrap_or(UserRole::Individual),
            agency_id,
        }))
    }

    // ========== Profile ==========

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
        profile_picture: Option<&str>,
    ) -> Result<UserProfile, ApiError> {
        let sql = format!(
            "UPDATE users SET name = COALESCE($1, name), phone = COALESCE($2, phone), \
             profile_picture = COALESCE($3, profile_picture), updated_at = now() \
             WHERE id = $4 RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as(&sql)
            .bind(name)
            .bind(phone)
            .bind(profile_picture)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }
}

fn map_unique_email(e: sqlx::Error) -> ApiError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return ApiError::Validation("An account with this email already exists".to_string());
        }
    }
    e.into()
}
