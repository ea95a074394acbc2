//! # Appointment Handlers
//!
//! Booking appointments with healthcare providers and listing the upcoming
//! ones as reminders.

use std::sync::Arc;

use axum::extract::{Extension, State};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::store::{Collection, Filter, USER_ID_FIELD};
use crate::utils::extract::AppJson;
use crate::utils::payload::owned_record;
use crate::utils::response::Reply;
use crate::utils::validator::normalize_timestamp;

/// RFC 3339 timestamp of the appointment.
pub const APPOINTMENT_DATE_FIELD: &str = "appointmentDate";

/// Books an appointment for the authenticated user.
///
/// POST /api/appointments { "appointmentDate": "2025-05-01T09:30:00Z", ... }
///
/// # Returns
///
/// - `200 OK` - `appointment` holds the stored record
/// - `400 Bad Request` - Body is not an object or `appointmentDate` is not RFC 3339
///
/// The date is stored in UTC.
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    debug!("Processing appointment booking");

    let mut appointment = owned_record(payload, &user.user_id)?;
    let date = appointment
        .get(APPOINTMENT_DATE_FIELD)
        .and_then(Value::as_str)
        .map(normalize_timestamp)
        .transpose()?
        .ok_or_else(|| {
            warn!("Appointment without a date");
            AppError::BadRequest("appointmentDate must be an RFC 3339 timestamp")
        })?;
    appointment.insert(APPOINTMENT_DATE_FIELD.to_string(), Value::String(date));

    let appointment = state
        .store
        .insert(Collection::Appointments, appointment)
        .await?;

    info!("Appointment booked");
    Reply::ok()
        .message("Appointment booked successfully")
        .with("appointment", appointment)
}

/// Lists the authenticated user's appointments that are still ahead.
///
/// GET /api/appointments/reminders
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_appointment_reminders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    let filter = Filter::eq(USER_ID_FIELD, user.user_id.to_string()).and(Filter::after(
        APPOINTMENT_DATE_FIELD,
        OffsetDateTime::now_utc(),
    ));

    let reminders = state.store.query(Collection::Appointments, &filter).await?;
    debug!(count = reminders.len(), "Upcoming appointments fetched");
    Reply::ok().with("reminders", reminders)
}
