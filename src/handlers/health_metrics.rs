//! # Health Metrics Handlers
//!
//! Each user has at most one health metrics record (sleep, exercise, water
//! intake and whatever else the dashboard tracks). Updates go through the
//! store's find-then-branch upsert keyed by `userId`.

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::store::{Collection, Filter, USER_ID_FIELD, Upserted};
use crate::utils::extract::AppJson;
use crate::utils::payload::owned_record;
use crate::utils::response::Reply;

/// Gets the authenticated user's health metrics.
///
/// GET /api/health-metrics
///
/// # Returns
///
/// - `200 OK` - `healthMetrics` holds the record
/// - `404 Not Found` - Nothing logged yet
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_health_metrics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    debug!("Processing health metrics request");

    let metrics = state
        .store
        .find_first(
            Collection::HealthMetrics,
            &Filter::eq(USER_ID_FIELD, user.user_id.to_string()),
        )
        .await?
        .ok_or(AppError::NotFound("No health data found"))?;

    Reply::ok().with("healthMetrics", metrics)
}

/// Creates or merges the authenticated user's health metrics.
///
/// PUT /api/health-metrics { ...metrics }
///
/// # Returns
///
/// - `201 Created` - First record for this user, returned as `newMetrics`
/// - `200 OK` - Existing record merged, returned as `updatedMetrics`
/// - `400 Bad Request` - Body is not a JSON object
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn update_health_metrics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    debug!("Processing health metrics update");

    let metrics = owned_record(payload, &user.user_id)?;
    let outcome = state
        .store
        .upsert(
            Collection::HealthMetrics,
            Filter::eq(USER_ID_FIELD, user.user_id.to_string()),
            metrics,
        )
        .await?;

    match outcome {
        Upserted::Created(record) => {
            info!("Health metrics created");
            Reply::new(StatusCode::CREATED).with("newMetrics", record)
        }
        Upserted::Updated(record) => {
            info!("Health metrics updated");
            Reply::ok().with("updatedMetrics", record)
        }
    }
}
