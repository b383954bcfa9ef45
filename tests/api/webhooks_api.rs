use crate::helpers::{self, PADDLE_API_KEY, TestApp, payload, requests};
use axum::http::StatusCode;
use sqlx::PgPool;

/// Reads the webhook-relevant columns for the default user.
///
async fn subscription_state(pool: &PgPool) -> (String, bool, Option<String>) {
    sqlx::query_as::<_, (String, bool, Option<String>)>(
        r#"
SELECT subscription_status, is_premium, subscription_id
FROM users WHERE username = 'john_doe'
		"#,
    )
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test]
async fn unauthenticated_webhook_should_be_rejected(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;

    // Act
    let response = app
        .client
        .post(format!("{}/webhooks/paddle", &app.url))
        .json(&payload::subscription_created("john.doe@example.com"))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn tampered_body_should_fail_signature_check(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;
    let event = payload::subscription_created("john.doe@example.com");
    let body = event.to_string();
    let header = format!(
        "ts=1700000000;h1={}",
        mailtone::paddle::signature::sign(helpers::WEBHOOK_SECRET, "1700000000", &body)
    );

    // Act: one flipped byte in the delivered body.
    let tampered = body.replace("john.doe", "jane.doe");
    let response = app
        .client
        .post(format!("{}/webhooks/paddle", &app.url))
        .header("Paddle-Signature", header)
        .header("Content-Type", "application/json")
        .body(tampered)
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let (status, premium, _) = subscription_state(&pool).await;
    assert_eq!(status, "inactive");
    assert!(!premium);
}

#[sqlx::test]
async fn created_event_should_activate_subscription(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;

    // Act
    let event = payload::subscription_created("john.doe@example.com");
    let response = requests::post_webhook_signed(&app, &event).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let (status, premium, subscription_id) = subscription_state(&pool).await;
    assert_eq!(status, "active");
    assert!(premium);
    assert_eq!(subscription_id.as_deref(), Some("sub_123"));
}

#[sqlx::test]
async fn updated_event_should_follow_reported_status(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;
    requests::post_webhook_signed(&app, &payload::subscription_created("john.doe@example.com"))
        .await;

    // Act
    let event = payload::subscription_updated("sub_123", "past_due");
    let response = requests::post_webhook_signed(&app, &event).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let (status, premium, _) = subscription_state(&pool).await;
    assert_eq!(status, "inactive");
    assert!(!premium);
}

#[sqlx::test]
async fn cancelled_event_should_be_idempotent(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;
    requests::post_webhook_signed(&app, &payload::subscription_created("john.doe@example.com"))
        .await;

    // Act: the classic alert shape over the legacy API key variant, twice.
    let event = payload::subscription_cancelled("sub_123");
    let first = requests::post_webhook_with_key(&app, &event, PADDLE_API_KEY).await;
    let state_after_first = subscription_state(&pool).await;
    let second = requests::post_webhook_with_key(&app, &event, PADDLE_API_KEY).await;

    // Assert
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    let state_after_second = subscription_state(&pool).await;
    assert_eq!(state_after_first.0, "cancelled");
    assert!(!state_after_first.1);
    assert_eq!(state_after_first, state_after_second);
}

#[sqlx::test]
async fn wrong_api_key_should_be_rejected(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;

    // Act
    let event = payload::subscription_cancelled("sub_123");
    let response = requests::post_webhook_with_key(&app, &event, "not-the-key").await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn unknown_event_should_be_acknowledged_without_changes(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;

    // Act
    let event = serde_json::json!({ "alert_name": "locker_processed" });
    let response = requests::post_webhook_signed(&app, &event).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let (status, premium, _) = subscription_state(&pool).await;
    assert_eq!(status, "inactive");
    assert!(!premium);
}

#[sqlx::test]
async fn processing_failure_should_still_be_acknowledged(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;

    // Act: correctly signed, but the body is not JSON at all.
    let body = "definitely not json";
    let header = format!(
        "ts=1700000000;h1={}",
        mailtone::paddle::signature::sign(helpers::WEBHOOK_SECRET, "1700000000", body)
    );
    let response = app
        .client
        .post(format!("{}/webhooks/paddle", &app.url))
        .header("Paddle-Signature", header)
        .body(body)
        .send()
        .await
        .unwrap();

    // Assert: the provider must not retry authenticated deliveries.
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test]
async fn event_for_unknown_subscription_should_be_acknowledged(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;

    // Act
    let event = payload::subscription_cancelled("sub_does_not_exist");
    let response = requests::post_webhook_signed(&app, &event).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
}
