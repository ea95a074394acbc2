//! # Authentication Handlers
//!
//! This module implements HTTP handlers for account registration and
//! password login with JWT session tokens. The flow consists of:
//!
//! 1. Registering an account with email, password and role
//! 2. Logging in with email and password to obtain a session token
//! 3. Checking the session on page load
//! 4. Logging out, which revokes the token until it would have expired

use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{AppState, Role};
use crate::services::account::{AccountError, normalize_email};
use crate::utils::extract::AppJson;
use crate::utils::response::Reply;

/// Request payload for creating an account
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: Role,
}

/// Request payload for logging in
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response containing the session token after a successful login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: u16,
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Registers a new adolescent or guardian account.
///
/// POST /api/auth/register RegisterRequest
///
/// # Returns
///
/// - `201 Created` - Account created
/// - `400 Bad Request` - Invalid email or password length
/// - `409 Conflict` - An account with this email already exists
/// - `500 Internal Server Error` - Store or hashing failure
#[instrument(skip_all, fields(role = %payload.role, request_id = %uuid::Uuid::new_v4()))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> AppResult<Reply> {
    debug!("Processing registration request");

    payload.email = normalize_email(&payload.email);
    if payload.validate().is_err() {
        warn!("Invalid registration input");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let account = state
        .accounts
        .register(&payload.email, &payload.password, payload.role)
        .await?;

    info!(user_id = %account.id, "Registration completed");
    Reply::new(StatusCode::CREATED)
        .message("User created successfully")
        .with("userId", account.id)
}

/// Logs a user in and returns a session token.
///
/// POST /api/auth/login LoginRequest
///
/// # Returns
///
/// - `200 OK` - Credentials accepted, returns [`LoginResponse`]
/// - `401 Unauthorized` - Wrong password
/// - `404 Not Found` - No account for this email
/// - `500 Internal Server Error` - Store or token failure
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(mut payload): AppJson<LoginRequest>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    debug!("Processing login request");

    payload.email = normalize_email(&payload.email);
    if payload.validate().is_err() {
        warn!("Invalid login input");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let account = state
        .accounts
        .authenticate(&payload.email, &payload.password)
        .await?;

    let issued = state
        .jwt_service
        .issue(account.id, account.role)
        .map_err(|e| {
            warn!(error = %e, "Failed to sign session token");
            AppError::Internal
        })?;

    info!(user_id = %account.id, "Login successful");
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            status: StatusCode::OK.as_u16(),
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        }),
    ))
}

/// Ends the current session.
///
/// POST /api/auth/logout
///
/// The presented token is revoked; any later request with it gets `401`.
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Reply {
    state.revoke_token(&user.token, &user.claims);
    info!("Session revoked");
    Reply::ok().message("Logged out successfully")
}

/// Reports whether the caller is logged in and who they are.
///
/// GET /api/auth/session
///
/// # Returns
///
/// - `200 OK` - `user` holds the account email
/// - `401 Unauthorized` - Missing, invalid or revoked token, or the account is gone
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn check_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    let account = match state.accounts.find_by_id(&user.user_id).await {
        Ok(account) => account,
        Err(AccountError::NotFound) => {
            warn!("Token refers to a deleted account");
            return Err(AppError::Unauthorized("User not logged in"));
        }
        Err(e) => return Err(e.into()),
    };

    Reply::ok().with("user", account.email)
}
