// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication route handlers.

use crate::app::{AppState, RequireAuth};
use crate::models::auth::{
    CorporateSignUpRequest, LoginRequest, MeResponse, MessageResponse, SignUpRequest,
    UpdateProfileRequest, UserProfile,
};
use crate::models::search::ErrorResponse;
use crate::services::auth_middleware::{
    clear_session_cookie, create_session_cookie, extract_session_token,
};
use crate::services::error::ApiError;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use tower_cookies::Cookies;
use utoipa::OpenApi;

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/corporate-signup", post(corporate_signup_handler))
        .route("/login", post(login_handler))
        .route("/signout", post(signout_handler))
        .route("/me", get(me_handler))
        .route("/me", put(update_profile_handler))
}

fn me_response(profile: UserProfile) -> MeResponse {
    MeResponse {
        user_id: profile.id,
        email: profile.email,
        role: profile.role,
        agency_id: profile.agency_id,
        name: profile.name,
        phone: profile.phone,
        profile_picture: profile.profile_picture,
    }
}

/// POST /auth/signup - Create an individual broker account and sign in.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = MeResponse),
        (status = 400, description = "Invalid email/password or email taken", body = ErrorResponse),
    )
)]
async fn signup_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<MeResponse>, ApiError> {
    let (token, profile) = state.auth.sign_up(&payload).await?;
    cookies.add(create_session_cookie(&token, state.session_max_age_days));
    Ok(Json(me_response(profile)))
}

/// POST /auth/corporate-signup - Create an agency and its first account.
#[utoipa::path(
    post,
    path = "/auth/corporate-signup",
    request_body = CorporateSignUpRequest,
    responses(
        (status = 200, description = "Agency and account created", body = MeResponse),
        (status = 400, description = "Invalid input or email taken", body = ErrorResponse),
    )
)]
async fn corporate_signup_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CorporateSignUpRequest>,
) -> Result<Json<MeResponse>, ApiError> {
    let (token, profile) = state.auth.sign_up_corporate(&payload).await?;
    cookies.add(create_session_cookie(&token, state.session_max_age_days));
    Ok(Json(me_response(profile)))
}

/// POST /auth/login - Sign in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
async fn login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = state.auth.sign_in(&payload.email, &payload.password).await?;
    cookies.add(create_session_cookie(&token, state.session_max_age_days));
    Ok(Json(MessageResponse {
        success: true,
        message: "Signed in".to_string(),
    }))
}

/// POST /auth/signout - Invalidate the session and clear the cookie.
#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
    )
)]
async fn signout_handler(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(token) = extract_session_token(&cookies) {
        state.auth.sign_out(&token).await?;
    }
    cookies.add(clear_session_cookie());
    Ok(Json(MessageResponse {
        success: true,
        message: "Signed out".to_string(),
    }))
}

/// GET /auth/me - Current authenticated user profile.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current profile", body = MeResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    )
)]
async fn me_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MeResponse>, ApiError> {
    let profile = state.auth.get_profile(user.user_id).await?;
    Ok(Json(me_response(profile)))
}

/// PUT /auth/me - Update the caller's own profile.
#[utoipa::path(
    put,
    path = "/auth/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = MeResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    )
)]
async fn update_profile_handler(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MeResponse>, ApiError> {
    let profile = state
        .auth
        .update_profile(
            user.user_id,
            payload.name.as_deref(),
            payload.phone.as_deref(),
            payload.profile_picture.as_deref(),
        )
        .await?;
    Ok(Json(me_response(profile)))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        signup_handler,
        corporate_signup_handler,
        login_handler,
        signout_handler,
        me_handler,
        update_profile_handler,
    ),
    components(schemas(
        SignUpRequest,
        CorporateSignUpRequest,
        LoginRequest,
        UpdateProfileRequest,
        MeResponse,
        MessageResponse,
        ErrorResponse,
    ))
)]
pub struct AuthApiDoc;
