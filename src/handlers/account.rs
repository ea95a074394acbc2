//! # Account Handlers
//!
//! Profile retrieval and settings updates for the signed-in user.

use std::sync::Arc;

use axum::extract::{Extension, State};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::utils::extract::AppJson;
use crate::utils::payload::into_record;
use crate::utils::response::Reply;

/// Gets the authenticated user's profile.
///
/// GET /api/profile
///
/// # Returns
///
/// - `200 OK` - `profile` holds id, email, role and stored settings
/// - `401 Unauthorized` - Missing or invalid authentication token
/// - `404 Not Found` - Account no longer exists
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    debug!("Processing profile request");

    let account = state.accounts.find_by_id(&user.user_id).await?;
    info!("Profile retrieved successfully");
    Reply::ok().with("profile", account.profile())
}

/// Merges new settings into the authenticated user's account.
///
/// PATCH /api/account/settings { ...settings }
///
/// # Returns
///
/// - `200 OK` - `updatedUser` holds the new profile
/// - `400 Bad Request` - Body is not an object or touches email, password or role
/// - `404 Not Found` - Account no longer exists
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    debug!("Processing settings update");

    let settings = into_record(payload)?;
    let account = state
        .accounts
        .update_settings(&user.user_id, settings)
        .await?;

    Reply::ok()
        .message("Account settings updated")
        .with("updatedUser", account.profile())
}
