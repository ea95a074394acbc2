#![allow(dead_code)]

use std::sync::{
    Arc, Mutex, Once,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use teen_health::{
    handlers::LoginResponse,
    services::{
        jwt::JwtService,
        payment::{PaymentConfirmation, PaymentError, PaymentGateway, PaymentRequest},
    },
    store::{MemoryStore, PgStore, RecordStore},
};
use sqlx::PgPool;
use tokio::net::TcpListener;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("teen_health=debug")
            .with_test_writer()
            .try_init();
    });
}

/// A mock payment gateway that records every payment it is handed.
/// Flip [`MockPaymentGateway::fail_next_payments`] to simulate an outage.
#[derive(Debug, Default)]
pub struct MockPaymentGateway {
    payments: Mutex<Vec<PaymentRequest>>,
    failing: AtomicBool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all payments received so far
    pub fn payments(&self) -> Vec<PaymentRequest> {
        self.payments.lock().unwrap().clone()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.lock().unwrap().len()
    }

    pub fn last_payment(&self) -> Option<PaymentRequest> {
        self.payments.lock().unwrap().last().cloned()
    }

    /// Make the gateway report the processor as unreachable
    pub fn fail_next_payments(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PaymentError::Unavailable("mock outage".to_string()));
        }

        self.payments.lock().unwrap().push(payment.clone());
        Ok(PaymentConfirmation {
            payment_id: format!("mock-{}", self.payment_count()),
            status: "Successful".to_string(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            details: payment.details.clone(),
        })
    }
}

/// Handles to a running test server.
pub struct TestApp<S = MemoryStore> {
    /// Format: `http://127.0.0.1:8492`
    pub address: String,
    pub store: Arc<S>,
    pub payments: Arc<MockPaymentGateway>,
    pub client: reqwest::Client,
}

/// Spawns the application over an in-memory store and a mock payment gateway.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_store(MemoryStore::new()).await
}

/// Spawns the application over PostgreSQL, on a pool handed out by `#[sqlx::test]`.
pub async fn spawn_app_with_pool(pool: PgPool) -> TestApp<PgStore> {
    spawn_app_with_store(PgStore::new(pool)).await
}

pub async fn spawn_app_with_store<S: RecordStore + 'static>(store: S) -> TestApp<S> {
    dotenvy::from_filename_override("tests/data/.test.env").unwrap();
    init_tracing_once();

    let store = Arc::new(store);
    let payments = Arc::new(MockPaymentGateway::new());
    let secret = teen_health::config::jwt_secret_from_env().expect("JWT_SECRET must be set");

    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    let store_backend: Arc<dyn RecordStore> = store.clone();
    let payment_gateway: Arc<dyn PaymentGateway> = payments.clone();
    let router = teen_health::app_with_services(
        store_backend,
        payment_gateway,
        JwtService::from_secret(&secret),
    );
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client
            .get(format!("{address}/health-check"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    TestApp {
        address,
        store,
        payments,
        client,
    }
}

impl<S> TestApp<S> {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Registers an account and returns its user id.
    pub async fn register(&self, email: &str, role: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({"email": email, "password": TEST_PASSWORD, "role": role}))
            .send()
            .await
            .expect("Failed to register");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["userId"].as_str().expect("userId missing").to_string()
    }

    /// Logs in with [`TEST_PASSWORD`] and returns the session token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({"email": email, "password": TEST_PASSWORD}))
            .send()
            .await
            .expect("Failed to log in");
        assert_eq!(response.status(), StatusCode::OK);

        let login: LoginResponse = response.json().await.expect("Failed to parse response");
        login.token
    }

    /// Registers and logs in, returning `(user_id, token)`.
    pub async fn sign_up(&self, email: &str, role: &str) -> (String, String) {
        let user_id = self.register(email, role).await;
        let token = self.login(email).await;
        (user_id, token)
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_authed(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_authed(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
