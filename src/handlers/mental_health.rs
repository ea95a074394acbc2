//! # Mental Health Handlers
//!
//! Resource listing, self-assessment submission and counselling session
//! booking.

use std::sync::Arc;

use axum::extract::{Extension, State};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::store::{Collection, Filter};
use crate::utils::extract::AppJson;
use crate::utils::payload::owned_record;
use crate::utils::response::Reply;

/// Lists articles, tips and videos.
///
/// GET /api/mental-health/resources
#[instrument(skip_all)]
pub async fn get_mental_health_resources(
    State(state): State<Arc<AppState>>,
) -> AppResult<Reply> {
    let resources = state
        .store
        .query(Collection::MentalHealthResources, &Filter::All)
        .await?;
    debug!(count = resources.len(), "Mental health resources fetched");
    Reply::ok().with("resources", resources)
}

/// Stores the user's self-assessment answers.
///
/// POST /api/mental-health/assessments { ...answers }
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn submit_self_assessment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    let assessment = owned_record(payload, &user.user_id)?;
    state
        .store
        .insert(Collection::MentalHealthAssessments, assessment)
        .await?;

    info!("Self-assessment stored");
    Ok(Reply::ok().message("Self-assessment submitted successfully"))
}

/// Books a session with a therapist.
///
/// POST /api/mental-health/sessions { ...session }
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn book_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    let session = owned_record(payload, &user.user_id)?;
    let session = state
        .store
        .insert(Collection::TherapistSessions, session)
        .await?;

    info!("Therapist session booked");
    Reply::ok().with("session", session)
}
