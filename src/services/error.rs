// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! API error taxonomy.
//!
//! Every collaborator failure is converted to one of these kinds at the
//! service boundary; raw driver errors never reach a response body. Nothing
//! here is retried; failures surface once and require user re-action.

use crate::models::search::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Error kinds surfaced by every service operation.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input; reported before any collaborator is
    /// contacted.
    Validation(String),
    /// No identity, or an invalid/expired session.
    Unauthorized(&'static str),
    /// The caller is identified but not permitted to act on the target.
    Forbidden(String),
    /// The referenced entity does not exist or is not visible to the caller.
    NotFound(String),
    /// The backing store (Postgres, S3, SMTP) rejected or failed the
    /// operation. The operation is fully failed, never partially applied.
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(msg) => ErrorResponse {
                error: msg,
                details: None,
            },
            ApiError::Unauthorized(msg) => ErrorResponse {
                error: msg.to_string(),
                details: None,
            },
            ApiError::Forbidden(msg) => ErrorResponse {
                error: msg,
                details: None,
            },
            ApiError::NotFound(msg) => ErrorResponse {
                error: msg,
                details: None,
            },
            ApiError::Storage(detail) => {
                eprintln!("[STORE] operation failed: {detail}");
                ErrorResponse {
                    error: "Request failed".to_string(),
                    details: Some(detail),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "validation error: {msg}"),
            ApiError::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            ApiError::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            ApiError::NotFound(msg) => write!(f, "not found: {msg}"),
            ApiError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("Authentication required").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Storage("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_into_response_statuses() {
        use axum::body::Body;
        use axum::http::Response;

        let response: Response<Body> =
            ApiError::Unauthorized("Authentication required").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response: Response<Body> =
            ApiError::Validation("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
