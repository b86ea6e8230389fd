// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Role Enum
// ============================================================================

/// Account kind: a lone broker, or a member of an agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Independent broker; owns listings directly.
    Individual,
    /// Agency member; listings roll up to the agency.
    Company,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Individual => "individual",
            UserRole::Company => "company",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(UserRole::Individual),
            "company" => Some(UserRole::Company),
            _ => None,
        }
    }
}

// ============================================================================
// Database Models
// ============================================================================

/// Broker profile record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub agency_id: Option<Uuid>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Agency record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Agency {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Session record (token stored as a SHA-256 hash).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

// ============================================================================
// Authenticated Caller Context
// ============================================================================

/// The identified caller, resolved from the session cookie.
///
/// Passed explicitly into every operation that needs an identity; nothing
/// reads ambient session state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub agency_id: Option<Uuid>,
}

impl AuthUser {
    /// Whether this caller may mutate a listing owned by `broker_id` /
    /// `agency_id`: the owning broker always may; a company user may touch
    /// any listing of their own agency.
    pub fn can_manage_listing(&self, broker_id: Uuid, agency_id: Option<Uuid>) -> bool {
        if self.user_id == broker_id {
            return true;
        }
        matches!(
            (self.role, self.agency_id, agency_id),
            (UserRole::Company, Some(own), Some(listing)) if own == listing
        )
    }
}

// ============================================================================
// API Request Types
// ============================================================================

/// Request to create an individual broker account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request to create an agency plus its first company account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CorporateSignUpRequest {
    pub email: String,
    pub password: String,
    pub agency_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request to sign in with email and password.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to update the caller's own profile.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

// ============================================================================
// API Response Types
// ============================================================================

/// Current authenticated user information.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Generic message response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        assert_eq!(
            UserRole::parse(UserRole::Individual.as_str()),
            Some(UserRole::Individual)
        );
        assert_eq!(
            UserRole::parse(UserRole::Company.as_str()),
            Some(UserRole::Company)
        );
        assert_eq!(UserRole::parse("admin"), None);
    }

    #[test]
    fn test_owner_can_manage_own_listing() {
        let broker = Uuid::new_v4();
        let user = AuthUser {
            user_id: broker,
            email: "a@example.com".to_string(),
            role: UserRole::Individual,
            agency_id: None,
        };
        assert!(user.can_manage_listing(broker, None));
        assert!(!user.can_manage_listing(Uuid::new_v4(), None));
    }

    #[test]
    fn test_company_user_can_manage_agency_listing() {
        let agency = Uuid::new_v4();
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "b@example.com".to_string(),
            role: UserRole::Company,
            agency_id: Some(agency),
        };
        assert!(user.can_manage_listing(Uuid::new_v4(), Some(agency)));
        assert!(!user.can_manage_listing(Uuid::new_v4(), Some(Uuid::new_v4())));
        assert!(!user.can_manage_listing(Uuid::new_v4(), None));
    }

    #[test]
    fn test_individual_cannot_manage_foreign_agency_listing() {
        let agency = Uuid::new_v4();
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "c@example.com".to_string(),
            role: UserRole::Individual,
            agency_id: Some(agency),
        };
        assert!(!user.can_manage_listing(Uuid::new_v4(), Some(agency)));
    }

    #[test]
    fn test_session_expiry() {
        let expired = Session {
            token_hash: "h".to_string(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            expires_at: Utc::now() - chrono::Duration::seconds(1),
            last_active_at: Utc::now(),
            user_agent: None,
            ip_address: None,
        };
        assert!(expired.is_expired());

        let valid = Session {
            expires_at: Utc::now() + chrono::Duration::hours(1),
            ..expired
        };
        assert!(!valid.is_expired());
    }
}
