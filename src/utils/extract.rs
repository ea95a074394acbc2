//! # Request Extractors
//!
//! Wrappers around axum's `Json` and `Query` whose rejections go through
//! [`AppError`], so malformed input still gets the `{ status, message }`
//! envelope and a `400` instead of axum's plain-text `415`/`422`.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;

/// JSON request body.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                warn!(
                    status = %rejection.status(),
                    reason = %rejection.body_text(),
                    "Rejected request body"
                );
                Err(AppError::BadRequest("Invalid request body"))
            }
        }
    }
}

/// Query string parameters.
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => {
                warn!(reason = %rejection.body_text(), "Rejected query string");
                Err(AppError::BadRequest("Invalid query parameters"))
            }
        }
    }
}
