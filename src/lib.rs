//! # Teen Health - Adolescent Health Website Backend
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers for the site's endpoints
//! - [`middleware`] - Authentication of protected routes
//! - [`models`] - Accounts and shared application state
//! - [`services`] - Accounts, JWT, payments and the symptom lookup
//! - [`store`] - The record store facade and its backends
//! - [`utils`] - Constants, validators and the response envelope

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, Environment};
use crate::handlers::*;
use crate::middleware::auth_middleware;
use crate::models::AppState;
use crate::services::jwt::JwtService;
use crate::services::payment::{ExternalPaymentGateway, LogPaymentGateway, PaymentGateway};
use crate::store::{PgStore, RecordStore};
use crate::utils::constant::*;

/// Creates an Axum router backed by PostgreSQL, picking the payment gateway
/// from the configuration.
///
/// - `production` uses [`ExternalPaymentGateway`] with `PAYMENT_API_URL` / `PAYMENT_API_KEY`
/// - anything else uses [`LogPaymentGateway`] (mock)
pub fn app(config: &Config, db_pool: PgPool) -> Router {
    let payment_gateway: Arc<dyn PaymentGateway> = match (&config.environment, &config.payment) {
        (Environment::Production, Some(payment)) => {
            info!("Running in production mode with [ExternalPaymentGateway]");
            Arc::new(ExternalPaymentGateway::new(
                payment.api_url.clone(),
                payment.api_key.clone(),
            ))
        }
        _ => {
            info!("Running in development mode with [LogPaymentGateway (Mock)]");
            Arc::new(LogPaymentGateway)
        }
    };

    app_with_services(
        Arc::new(PgStore::new(db_pool)),
        payment_gateway,
        JwtService::from_secret(&config.jwt_secret),
    )
}

/// Creates an Axum router with application routes and state.
///
/// # Arguments
///
/// * `store` - Record store backend
/// * `payment_gateway` - Payment processor
/// * `jwt_service` - Session token signer/verifier
///
/// # Returns
///
/// A configured Axum router with all application routes and middleware.
/// Must be called inside a Tokio runtime; it spawns the revocation cleanup task.
pub fn app_with_services(
    store: Arc<dyn RecordStore>,
    payment_gateway: Arc<dyn PaymentGateway>,
    jwt_service: JwtService,
) -> Router {
    let state = Arc::new(AppState::new(store, payment_gateway, jwt_service));

    let state_clone = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_CLEANUP_INTERVAL);
        interval.tick().await; // first tick completes immediately
        loop {
            interval.tick().await;
            state_clone.cleanup_expired_entries();
        }
    });

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(check_session))
        .route("/api/profile", get(get_profile))
        .route("/api/account/settings", patch(update_settings))
        .route(
            "/api/health-metrics",
            get(get_health_metrics).put(update_health_metrics),
        )
        .route("/api/mental-health/assessments", post(submit_self_assessment))
        .route("/api/mental-health/sessions", post(book_session))
        .route("/api/appointments", post(book_appointment))
        .route("/api/appointments/reminders", get(get_appointment_reminders))
        .route("/api/nutrition-plan", get(get_nutrition_plan))
        .route("/api/fitness-activities", post(log_fitness_activity))
        .route("/api/guardian-access", post(request_guardian_access))
        .route("/api/cart", get(get_cart_items).post(add_to_cart))
        .route("/api/bookings", get(get_user_bookings).post(submit_booking_form))
        .route("/api/programs/mine", get(get_user_programs))
        .route("/api/feedback", post(save_feedback))
        .route("/api/payments", post(process_payment))
        .route_layer(from_fn_with_state(Arc::clone(&state), auth_middleware));

    let public_routes = Router::new()
        .route("/health-check", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/symptoms", post(submit_symptoms))
        .route("/api/pages/{page_id}", get(fetch_page))
        .route("/api/home", get(fetch_home_page_content))
        .route("/api/search", get(get_search_results))
        .route("/api/blog/posts", get(fetch_blog_posts))
        .route("/api/blog/posts/{post_id}", get(fetch_blog_post))
        .route("/api/mental-health/resources", get(get_mental_health_resources))
        .route("/api/services/{service_id}", get(fetch_service_details))
        .route("/api/booking-slots", get(fetch_available_slots))
        .route("/api/programs/visitor", get(get_visitor_programs))
        .route("/api/programs/participant", get(get_participant_programs));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
