//! # Authentication Middleware
//!
//! This module contains the authentication middleware that validates JWT tokens
//! and provides user context to protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, instrument, trace, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::AppState;
use crate::services::jwt::Claims;

/// Authentication middleware for protecting routes
///
/// This middleware validates JWT session tokens from the Authorization header
/// and extracts user information for use by downstream handlers. Protected
/// routes will automatically receive the authenticated user context.
///
/// # Authentication Flow
///
/// 1. Extracts `Authorization` header with `Bearer <token>` format
/// 2. Validates the JWT token signature and expiration
/// 3. Rejects tokens that were revoked by a logout
/// 4. Parses user ID from token claims
/// 5. Adds [`AuthUser`] to request extensions for handler access
///
/// # Returns
///
/// - **Success**: Continues to next handler with user context
/// - **Failure**: Returns `401 Unauthorized` for invalid/missing/revoked tokens
#[instrument(
    skip_all,
    fields(
        method = %req.method(),
        uri = %req.uri(),
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    trace!("Processing authentication middleware");

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let Some(auth_header) = auth_header else {
        warn!("Missing Authorization header");
        return Err(AppError::Unauthorized("User not logged in"));
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        warn!("Invalid Authorization header format");
        return Err(AppError::Unauthorized("User not logged in"));
    };
    trace!("Extracted bearer token from Authorization header");

    let claims = state.jwt_service.validate_access_token(token).map_err(|e| {
        warn!(error = %e, "Token validation failed");
        AppError::Unauthorized("Invalid or expired session")
    })?;

    if state.is_token_revoked(token) {
        warn!("Token was revoked by logout");
        return Err(AppError::Unauthorized("Session has been logged out"));
    }

    let user_id = Uuid::try_parse(&claims.sub).map_err(|e| {
        error!(error = %e, "Failed to parse user ID from token claims");
        AppError::Unauthorized("Invalid or expired session")
    })?;

    debug!(user_id = %user_id, "Authentication successful");
    let token = token.to_string();
    req.extensions_mut().insert(AuthUser {
        user_id,
        claims,
        token,
    });

    let response = next.run(req).await;
    debug!("Request processed successfully");
    Ok(response)
}

/// Authenticated user information available to handlers
///
/// This struct is inserted into request extensions by the authentication
/// middleware and can be extracted by route handlers that need user context.
///
/// # Usage in Handlers
///
/// ```rust
/// use axum::{extract::Extension, response::IntoResponse};
/// use teen_health::middleware::AuthUser;
/// async fn protected_handler(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
///     format!("Hello user: {}", user.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Unique identifier for the authenticated user
    pub user_id: Uuid,
    /// JWT claims containing additional token metadata
    pub claims: Claims,
    /// The raw bearer token, needed to revoke it on logout
    pub token: String,
}
