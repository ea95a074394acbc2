//! # Payment Service
//!
//! Payments are handed to an external processor; this layer only forwards the
//! payload and returns the processor's confirmation.
//!
//! ## Implementations
//!
//! - [`LogPaymentGateway`] - Development/testing implementation that logs payments
//!   and confirms them immediately
//! - [`ExternalPaymentGateway`] - Production implementation using the processor's HTTP API
//!
//! ## Usage
//!
//! The gateway is chosen from the `APP_ENV` environment variable:
//! - **Production**: Uses `ExternalPaymentGateway` with the real processor
//! - **Development/Testing**: Uses `LogPaymentGateway`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Errors that can occur during payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment declined by processor: {0}")]
    Declined(String),
    #[error("Payment processor unreachable: {0}")]
    Unavailable(String),
}

/// Payment handed to the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: String,
    /// Processor-specific fields passed through untouched.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Processor response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Trait for payment processors
///
/// This trait provides a common interface for the real processor and the
/// development stand-in.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits a payment and returns the processor's confirmation.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::Declined`] - the processor rejected the payment
    /// - [`PaymentError::Unavailable`] - the processor could not be reached
    async fn create_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentError>;
}

/// Mock payment gateway for development and testing
///
/// Logs the payment and confirms it as `Successful` without contacting
/// anything.
pub struct LogPaymentGateway;

#[async_trait]
impl PaymentGateway for LogPaymentGateway {
    #[instrument(skip_all, fields(amount = payment.amount, currency = %payment.currency))]
    async fn create_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentError> {
        info!("Confirming mock payment");
        Ok(PaymentConfirmation {
            payment_id: Uuid::new_v4().to_string(),
            status: "Successful".to_string(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            details: payment.details.clone(),
        })
    }
}

/// External payment gateway for production use
///
/// # Configuration
///
/// Requires the following environment variables in production:
/// - `PAYMENT_API_URL` - Endpoint that creates payments
/// - `PAYMENT_API_KEY` - Bearer token for the processor
pub struct ExternalPaymentGateway {
    api_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl ExternalPaymentGateway {
    /// Creates a new external payment gateway instance.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Endpoint of the processor's payment API
    /// * `api_key` - Authentication key for the processor
    pub fn new(api_url: String, api_key: String) -> Self {
        info!(api_url = %api_url, "Initializing external payment gateway");

        Self {
            api_url,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for ExternalPaymentGateway {
    #[instrument(skip_all, fields(amount = payment.amount, currency = %payment.currency))]
    async fn create_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentError> {
        debug!("Sending HTTP request to payment API");
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(payment)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                let confirmation = res.json::<PaymentConfirmation>().await.map_err(|e| {
                    error!(error = %e, "Payment API returned an unreadable confirmation");
                    PaymentError::Unavailable(format!("Invalid confirmation body: {e}"))
                })?;
                info!(payment_id = %confirmation.payment_id, "Payment confirmed");
                Ok(confirmation)
            }
            Ok(res) => {
                let status = res.status();
                let error_body = res
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error response body".to_string());

                error!(
                    status = %status,
                    error_body = %error_body,
                    "Payment API returned error"
                );

                Err(PaymentError::Declined(format!(
                    "Payment processor API error: {error_body}"
                )))
            }
            Err(e) => {
                error!(error = %e, "Network request to payment API failed");
                Err(PaymentError::Unavailable(format!(
                    "Network request error: {e}"
                )))
            }
        }
    }
}
