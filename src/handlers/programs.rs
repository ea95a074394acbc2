//! # Health Program Handlers
//!
//! Program listings for visitors, participants and enrolled users, and the
//! program payment pass-through.

use std::sync::Arc;

use axum::extract::{Extension, State};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::services::payment::PaymentRequest;
use crate::store::{Collection, Filter, USER_ID_FIELD};
use crate::utils::extract::AppJson;
use crate::utils::response::Reply;

/// Request payload for a program payment
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentPayload {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency"))
    }
}

async fn programs_of_type(state: &AppState, program_type: &str) -> AppResult<Reply> {
    let programs = state
        .store
        .query(Collection::HealthPrograms, &Filter::eq("type", program_type))
        .await?;
    debug!(program_type, count = programs.len(), "Programs fetched");
    Reply::ok().with("programs", programs)
}

/// GET /api/programs/visitor
#[instrument(skip_all)]
pub async fn get_visitor_programs(State(state): State<Arc<AppState>>) -> AppResult<Reply> {
    programs_of_type(&state, "visitor").await
}

/// GET /api/programs/participant
#[instrument(skip_all)]
pub async fn get_participant_programs(State(state): State<Arc<AppState>>) -> AppResult<Reply> {
    programs_of_type(&state, "participant").await
}

/// Lists the programs the authenticated user is enrolled in.
///
/// GET /api/programs/mine
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn get_user_programs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    let programs = state
        .store
        .query(
            Collection::HealthPrograms,
            &Filter::eq(USER_ID_FIELD, user.user_id.to_string()),
        )
        .await?;
    Reply::ok().with("programs", programs)
}

/// Pays for a health program through the payment processor.
///
/// POST /api/payments { "amount": 25.0, "currency": "USD", ... }
///
/// # Returns
///
/// - `200 OK` - `payment` holds the processor's confirmation
/// - `400 Bad Request` - Non-positive amount or malformed currency
/// - `502 Bad Gateway` - The processor declined or could not be reached
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<PaymentPayload>,
) -> AppResult<Reply> {
    debug!("Processing payment request");

    if payload.validate().is_err() {
        warn!("Invalid payment input");
        return Err(AppError::BadRequest("Invalid payment amount or currency"));
    }

    let mut details = payload.details;
    details.insert(
        USER_ID_FIELD.to_string(),
        Value::String(user.user_id.to_string()),
    );
    let request = PaymentRequest {
        amount: payload.amount,
        currency: payload.currency.to_ascii_uppercase(),
        details,
    };

    let payment = state.payment_gateway.create_payment(&request).await?;
    info!(payment_id = %payment.payment_id, "Payment processed");
    Reply::ok().with("payment", payment)
}
