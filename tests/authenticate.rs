mod common;

use common::{TEST_PASSWORD, spawn_app};
use reqwest::StatusCode;
use serde_json::{Value, json};
use teen_health::handlers::LoginResponse;
use teen_health::store::Collection;

#[tokio::test]
async fn test_register_creates_account() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "Alex@Example.com",
            "password": TEST_PASSWORD,
            "role": "adolescent"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "User created successfully");
    assert!(body["userId"].is_string());
    assert_eq!(app.store.count(Collection::Users), 1);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = spawn_app().await;
    app.register("sam@example.com", "adolescent").await;

    // Same address with different casing
    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "SAM@Example.com",
            "password": "another-password",
            "role": "guardian"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 409);
    assert_eq!(body["message"], "User already exists");
    assert_eq!(app.store.count(Collection::Users), 1);
}

#[tokio::test]
async fn test_register_and_login_trim_email() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "email": "  Kim@Example.com ",
            "password": TEST_PASSWORD,
            "role": "adolescent"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    app.login("kim@example.com").await;
    app.login(" KIM@example.com\t").await;
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = spawn_app().await;

    for payload in [
        json!({"email": "not-an-email", "password": TEST_PASSWORD, "role": "adolescent"}),
        json!({"email": "short@example.com", "password": "short", "role": "adolescent"}),
    ] {
        let response = app
            .client
            .post(app.url("/api/auth/register"))
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.text().await.unwrap();
        assert!(body.contains("Invalid input"));
    }
    assert_eq!(app.store.count(Collection::Users), 0);
}

#[tokio::test]
async fn test_login_success_returns_bearer_token() {
    let app = spawn_app().await;
    app.register("jo@example.com", "guardian").await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({"email": "jo@example.com", "password": TEST_PASSWORD}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let login: LoginResponse = response.json().await.unwrap();
    assert_eq!(login.status, 200);
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.expires_in, 3600);
    assert!(!login.token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = spawn_app().await;
    app.register("jo@example.com", "guardian").await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({"email": "jo@example.com", "password": "wrong-password"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({"email": "nobody@example.com", "password": TEST_PASSWORD}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_session_requires_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/auth/session"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get_authed("/api/auth/session", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_reports_current_user() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("kim@example.com", "adolescent").await;

    let response = app.get_authed("/api/auth/session", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"], "kim@example.com");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("kim@example.com", "adolescent").await;
    let other_token = app.login("kim@example.com").await;

    let response = app.post_authed("/api/auth/logout", &token, &json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get_authed("/api/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Session has been logged out");

    // Other sessions of the same user stay valid
    let response = app.get_authed("/api/auth/session", &other_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_profile_hides_password_hash() {
    let app = spawn_app().await;
    let (user_id, token) = app.sign_up("lee@example.com", "guardian").await;

    let response = app.get_authed("/api/profile", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["profile"]["_id"], user_id.as_str());
    assert_eq!(body["profile"]["email"], "lee@example.com");
    assert_eq!(body["profile"]["role"], "guardian");
    assert!(!body.to_string().contains("passwordHash"));
}

#[tokio::test]
async fn test_update_settings_merges_fields() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("lee@example.com", "adolescent").await;

    let response = app
        .client
        .patch(app.url("/api/account/settings"))
        .bearer_auth(&token)
        .json(&json!({"displayName": "Lee", "newsletter": true}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["updatedUser"]["displayName"], "Lee");
    assert_eq!(body["updatedUser"]["newsletter"], true);
    assert_eq!(body["updatedUser"]["role"], "adolescent");

    // The account still logs in with the same password
    app.login("lee@example.com").await;
}

#[tokio::test]
async fn test_update_settings_rejects_protected_fields() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("lee@example.com", "adolescent").await;

    for payload in [
        json!({"role": "guardian"}),
        json!({"email": "other@example.com"}),
        json!({"passwordHash": "x"}),
    ] {
        let response = app
            .client
            .patch(app.url("/api/account/settings"))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app.get_authed("/api/profile", &token).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["profile"]["role"], "adolescent");
    assert_eq!(body["profile"]["email"], "lee@example.com");
}
