use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info, instrument};

use crate::services::account::AccountService;
use crate::services::jwt::{Claims, JwtService, token_fingerprint, unix_now};
use crate::services::payment::PaymentGateway;
use crate::services::symptom::RecommendationTable;
use crate::store::RecordStore;
use crate::utils::constant::*;

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// The document store all handlers read from and write to.
    pub store: Arc<dyn RecordStore>,
    /// Account registration and credential checks.
    pub accounts: AccountService,
    /// The payment processor payments are forwarded to.
    pub payment_gateway: Arc<dyn PaymentGateway>,
    /// JWT service for token generation and validation.
    pub jwt_service: JwtService,
    /// Symptom advice table, fixed at startup.
    pub recommendations: RecommendationTable,
    /// Fingerprints of logged-out tokens and the instant they would have expired.
    pub revoked_tokens: DashMap<String, Instant>,
}

impl AppState {
    /// Creates a new application state with the provided services.
    ///
    /// # Arguments
    ///
    /// * `store` - Record store backend
    /// * `payment_gateway` - Payment processor
    /// * `jwt_service` - Service for JWT token operations
    pub fn new(
        store: Arc<dyn RecordStore>,
        payment_gateway: Arc<dyn PaymentGateway>,
        jwt_service: JwtService,
    ) -> Self {
        info!("Initializing application state");
        let recommendations = RecommendationTable::builtin();
        debug!(
            known_symptoms = recommendations.known_symptoms().count(),
            "Loaded symptom recommendations"
        );

        Self {
            accounts: AccountService::new(Arc::clone(&store)),
            store,
            payment_gateway,
            jwt_service,
            recommendations,
            revoked_tokens: DashMap::new(),
        }
    }

    /// Remembers `token` as logged out until it would have expired.
    pub fn revoke_token(&self, token: &str, claims: &Claims) {
        let remaining = Duration::from_secs(claims.exp.saturating_sub(unix_now()));
        self.revoked_tokens
            .insert(token_fingerprint(token), Instant::now() + remaining);
    }

    #[inline]
    pub fn is_token_revoked(&self, token: &str) -> bool {
        self.revoked_tokens.contains_key(&token_fingerprint(token))
    }

    /// Cleans up revocation entries whose tokens have expired anyway.
    ///
    /// This method is called periodically to prevent memory leaks from expired entries.
    /// Only performs cleanup when the map size exceeds the configured capacity.
    #[instrument(skip_all)]
    pub fn cleanup_expired_entries(&self) {
        let revoked_size = self.revoked_tokens.len();

        debug!(
            revoked_size,
            cache_capacity = CACHE_CAPACITY,
            "Checking if cache cleanup is needed"
        );

        if revoked_size > CACHE_CAPACITY {
            let now = Instant::now();
            self.revoked_tokens.retain(|_, expires_at| *expires_at > now);
            let final_size = self.revoked_tokens.len();

            info!(
                initial_size = revoked_size,
                final_size,
                removed = revoked_size - final_size,
                "Cleaned up expired revocation entries"
            );
        }
    }
}
