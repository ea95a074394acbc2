//! # Booking Handlers
//!
//! Service pages, booking slots, the booking form, the cart and the
//! post-purchase feedback form.

use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::store::{Collection, Filter, USER_ID_FIELD};
use crate::utils::extract::{AppJson, AppQuery};
use crate::utils::payload::{into_record, owned_record};
use crate::utils::response::Reply;
use crate::utils::validator::{validate_date, validate_identifier};

#[derive(Debug, Deserialize)]
pub struct SlotParams {
    pub date: String,
}

/// Fetches a bookable service by its `serviceId`.
///
/// GET /api/services/{service_id}
#[instrument(skip(state))]
pub async fn fetch_service_details(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> AppResult<Reply> {
    validate_identifier(&service_id)?;
    let service = state
        .store
        .find_first(Collection::Services, &Filter::eq("serviceId", service_id))
        .await?
        .ok_or(AppError::NotFound("Service not found"))?;
    Reply::ok().with("service", service)
}

/// Lists booking slots on a given day.
///
/// GET /api/booking-slots?date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn fetch_available_slots(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SlotParams>,
) -> AppResult<Reply> {
    validate_date(&params.date)?;
    let slots = state
        .store
        .query(Collection::BookingSlots, &Filter::eq("date", params.date))
        .await?;
    debug!(count = slots.len(), "Booking slots fetched");
    Reply::ok().with("slots", slots)
}

/// Submits the booking form.
///
/// POST /api/bookings { ...form }
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn submit_booking_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    let booking = owned_record(payload, &user.user_id)?;
    let booking = state.store.insert(Collection::Bookings, booking).await?;

    info!("Booking confirmed");
    Reply::ok()
        .message("Booking confirmed")
        .with("booking", booking)
}

/// GET /api/bookings
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    let bookings = state
        .store
        .query(
            Collection::Bookings,
            &Filter::eq(USER_ID_FIELD, user.user_id.to_string()),
        )
        .await?;
    Reply::ok().with("bookings", bookings)
}

/// Adds a service to the user's cart.
///
/// POST /api/cart { ...serviceDetails }
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    let item = owned_record(payload, &user.user_id)?;
    let cart_item = state.store.insert(Collection::CartItems, item).await?;

    info!("Service added to cart");
    Reply::ok()
        .message("Service added to cart")
        .with("cartItem", cart_item)
}

/// GET /api/cart
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn get_cart_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Reply> {
    let items = state
        .store
        .query(
            Collection::CartItems,
            &Filter::eq(USER_ID_FIELD, user.user_id.to_string()),
        )
        .await?;
    Reply::ok().with("items", items)
}

/// Saves post-purchase feedback from the thank-you page.
///
/// POST /api/feedback { ...feedback }
#[instrument(skip_all, fields(user_id = %user.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn save_feedback(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Reply> {
    let feedback = into_record(payload)?;
    let feedback = state
        .store
        .insert(Collection::ThankYouPageFeedback, feedback)
        .await?;

    info!("Feedback saved");
    Reply::ok()
        .message("Feedback saved successfully")
        .with("feedback", feedback)
}
