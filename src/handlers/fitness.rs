//! # Nutrition and Fitness Handlers

use std::sync::Arc;

use axum::extract::{Extension, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::store::Collection;
use crate::utils::extract::AppJson;
use crate::utils::payload::owned_record;
use crate::utils::response::Reply;

/// A day's meal suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionPlan {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

impl NutritionPlan {
    /// The plan every user currently receives.
    pub fn standard() -> Self {
        Self {
            breakfast: "Oatmeal with fruits and nuts".to_string(),
            lunch: "Chicken salad with quinoa".to_string(),
            dinner: "Grilled salmon with vegetables".to_string(),
        }
    }
}

/// Returns the user's nutrition plan.
///
/// GET /api/nutrition-plan
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn get_nutrition_plan(Extension(user): Extension<AuthUser>) -> AppResult<Reply> {
    Reply::ok().with("nutritionPlan", NutritionPlan::standard())
}

/// Logs a fitness activity for the authenticated user.
///
/// POST /api/fitness-activities { ...activity }
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn log_fitness_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    let activity = owned_record(payload, &user.user_id)?;
    let logged_activity = state
        .store
        .insert(Collection::FitnessActivities, activity)
        .await?;

    info!("Fitness activity logged");
    Reply::ok().with("loggedActivity", logged_activity)
}
