//! # Symptom Checker Handler

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::AppResult;
use crate::models::AppState;
use crate::utils::extract::AppJson;
use crate::utils::response::Reply;

#[derive(Debug, Deserialize)]
pub struct SymptomsRequest {
    pub symptoms: Vec<String>,
}

/// Returns one piece of advice per submitted symptom.
///
/// POST /api/symptoms { "symptoms": ["fever", ...] }
///
/// Unknown symptoms get the generic fallback advice; the order of
/// `recommendations` matches the order of `symptoms`.
#[instrument(skip_all, fields(symptom_count = payload.symptoms.len()))]
pub async fn submit_symptoms(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<SymptomsRequest>,
) -> AppResult<Reply> {
    debug!("Processing symptom submission");
    let recommendations = state.recommendations.recommend(&payload.symptoms);
    Reply::ok().with("recommendations", recommendations)
}
