mod common;

use common::spawn_app;
use reqwest::StatusCode;
use serde_json::{Value, json};
use teen_health::handlers::NutritionPlan;
use teen_health::store::Collection;

#[tokio::test]
async fn test_cart_is_per_user() {
    let app = spawn_app().await;
    let (user_id, alex_token) = app.sign_up("alex@example.com", "adolescent").await;
    let (_, sam_token) = app.sign_up("sam@example.com", "adolescent").await;

    let response = app
        .post_authed("/api/cart", &alex_token, &json!({"serviceId": "counselling"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Service added to cart");
    assert_eq!(body["cartItem"]["userId"], user_id.as_str());

    let response = app.get_authed("/api/cart", &alex_token).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let response = app.get_authed("/api/cart", &sam_token).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_submit_and_list_bookings() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("alex@example.com", "adolescent").await;

    let response = app
        .post_authed(
            "/api/bookings",
            &token,
            &json!({"serviceId": "counselling", "slot": "2025-05-01T09:00"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Booking confirmed");

    let response = app.get_authed("/api/bookings", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["serviceId"], "counselling");
}

#[tokio::test]
async fn test_client_cannot_set_managed_fields() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("alex@example.com", "adolescent").await;

    let response = app
        .post_authed(
            "/api/bookings",
            &token,
            &json!({"_id": "not-a-uuid", "_createdDate": "1999-01-01T00:00:00Z"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_ne!(body["booking"]["_id"], "not-a-uuid");
    assert_ne!(body["booking"]["_createdDate"], "1999-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_save_feedback() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("alex@example.com", "adolescent").await;

    let response = app
        .post_authed("/api/feedback", &token, &json!({"rating": 5, "comment": "Great"}))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Feedback saved successfully");
    assert_eq!(body["feedback"]["rating"], 5);
    assert_eq!(app.store.count(Collection::ThankYouPageFeedback), 1);
}

#[tokio::test]
async fn test_mental_health_submissions() {
    let app = spawn_app().await;
    let (user_id, token) = app.sign_up("alex@example.com", "adolescent").await;

    let response = app
        .post_authed(
            "/api/mental-health/assessments",
            &token,
            &json!({"mood": 3, "anxiety": 2}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Self-assessment submitted successfully");
    assert_eq!(app.store.count(Collection::MentalHealthAssessments), 1);

    let response = app
        .post_authed(
            "/api/mental-health/sessions",
            &token,
            &json!({"therapist": "Dr. Park", "date": "2025-05-01"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["session"]["therapist"], "Dr. Park");
    assert_eq!(body["session"]["userId"], user_id.as_str());
}

#[tokio::test]
async fn test_fitness_and_nutrition() {
    let app = spawn_app().await;
    let (_, token) = app.sign_up("alex@example.com", "adolescent").await;

    let response = app.get_authed("/api/nutrition-plan", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let plan: NutritionPlan = serde_json::from_value(body["nutritionPlan"].clone()).unwrap();
    assert_eq!(plan, NutritionPlan::standard());

    let response = app
        .post_authed(
            "/api/fitness-activities",
            &token,
            &json!({"activity": "running", "minutes": 30}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["loggedActivity"]["activity"], "running");
    assert_eq!(app.store.count(Collection::FitnessActivities), 1);
}

#[tokio::test]
async fn test_protected_routes_reject_anonymous_writes() {
    let app = spawn_app().await;

    for path in ["/api/cart", "/api/bookings", "/api/feedback", "/api/fitness-activities"] {
        let response = app
            .client
            .post(app.url(path))
            .json(&json!({"x": 1}))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    assert_eq!(app.store.count(Collection::CartItems), 0);
    assert_eq!(app.store.count(Collection::Bookings), 0);
}
