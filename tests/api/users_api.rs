use crate::helpers::{self, TestApp, payload, requests};
use axum::http::StatusCode;
use mailtone::web::auth::token;
use mailtone::web::types::{TokenPayload, UserResponse};
use serde_json::json;
use sqlx::PgPool;
use std::time::Duration;

#[sqlx::test]
async fn should_register(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;

    // Act
    let endpoint = format!("{}/users/register", &app.url);
    let payload = payload::register_user();
    let response = requests::post_response(&app, &endpoint, "", &payload).await;

    // Assert
    assert!(response.status().is_success());
    let user = response.json::<UserResponse>().await.unwrap().result;
    assert_eq!(user.username, "john_doe");
    assert_eq!(user.email, "john.doe@example.com");

    // A pending verification token is stored with the row.
    let token = helpers::verification_token_of(&pool, "john_doe").await;
    assert!(token.is_some());
}

#[sqlx::test]
async fn register_sends_verification_email_in_background(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;

    // Act
    let endpoint = format!("{}/users/register", &app.url);
    requests::post_response(&app, &endpoint, "", &payload::register_user()).await;

    // Assert
    tokio::time::sleep(Duration::from_millis(200)).await;
    let messages = app.outbox.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "john.doe@example.com");
    assert_eq!(messages[0].subject, "Verify your email");

    let token = helpers::verification_token_of(&pool, "john_doe").await.unwrap();
    assert!(messages[0].body.contains(&token));
}

#[sqlx::test]
async fn duplicate_username_should_be_rejected(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;
    let endpoint = format!("{}/users/register", &app.url);
    requests::post_response(&app, &endpoint, "", &payload::register_user()).await;

    // Act
    let payload = json!({
        "username": "john_doe",
        "email": "second.address@example.com",
        "password": "secure_password_123",
    });
    let response = requests::post_response(&app, &endpoint, "", &payload).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Username already registered");
}

#[sqlx::test]
async fn duplicate_email_should_be_rejected(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;
    let endpoint = format!("{}/users/register", &app.url);
    requests::post_response(&app, &endpoint, "", &payload::register_user()).await;

    // Act
    let payload = json!({
        "username": "second_user",
        "email": "john.doe@example.com",
        "password": "secure_password_123",
    });
    let response = requests::post_response(&app, &endpoint, "", &payload).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Email already registered");
}

#[sqlx::test]
async fn login_before_verification_should_be_rejected(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    let endpoint = format!("{}/users/register", &app.url);
    requests::post_response(&app, &endpoint, "", &payload::register_user()).await;

    // Act
    let endpoint = format!("{}/users/login", &app.url);
    let response = requests::post_response(&app, &endpoint, "", &payload::login_user()).await;

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.text().await.unwrap();
    assert!(body.contains("Email not verified"));

    // A fresh token was re-issued and stays on the record.
    let token = helpers::verification_token_of(&pool, "john_doe").await;
    assert!(token.is_some());
}

#[sqlx::test]
async fn verify_then_login_should_return_token_for_subject(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    let endpoint = format!("{}/users/register", &app.url);
    requests::post_response(&app, &endpoint, "", &payload::register_user()).await;
    let verification = helpers::verification_token_of(&pool, "john_doe").await.unwrap();

    // Act
    let endpoint = format!("{}/users/verify?token={}", &app.url, verification);
    let verify_response = requests::get_response(&app, &endpoint, "").await;

    let endpoint = format!("{}/users/login", &app.url);
    let jwt =
        requests::post_result::<TokenPayload>(&app, &endpoint, "", &payload::login_user()).await;

    // Assert
    assert!(verify_response.status().is_success());
    let claims = token::validate(&jwt.token, &app.config).unwrap();
    assert_eq!(claims.sub, "john_doe");

    // Consuming the token cleared it from the record.
    let token = helpers::verification_token_of(&pool, "john_doe").await;
    assert!(token.is_none());
}

#[sqlx::test]
async fn stale_verification_token_should_be_rejected(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    let endpoint = format!("{}/users/register", &app.url);
    requests::post_response(&app, &endpoint, "", &payload::register_user()).await;
    let verification = helpers::verification_token_of(&pool, "john_doe").await.unwrap();

    let endpoint = format!("{}/users/verify?token={}", &app.url, verification);
    let first = requests::get_response(&app, &endpoint, "").await;

    // Act
    let second = requests::get_response(&app, &endpoint, "").await;

    // Assert
    assert!(first.status().is_success());
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(second.text().await.unwrap(), "Invalid or expired token!");
}

#[sqlx::test]
async fn wrong_password_and_unknown_username_should_be_indistinguishable(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;

    // Act
    let endpoint = format!("{}/users/login", &app.url);
    let wrong_password = json!({ "username": "john_doe", "password": "wrong_password" });
    let first = requests::post_response(&app, &endpoint, "", &wrong_password).await;

    let unknown_user = json!({ "username": "jane_doe", "password": "secure_password_123" });
    let second = requests::post_response(&app, &endpoint, "", &unknown_user).await;

    // Assert
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        first.text().await.unwrap(),
        second.text().await.unwrap(),
        "responses must carry no enumeration signal"
    );
}

#[sqlx::test]
async fn password_reset_flow_should_work_once(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    helpers::register_verified_user(&app, &pool).await;

    let endpoint = format!("{}/users/request-password-reset", &app.url);
    let payload = json!({ "email": "john.doe@example.com" });
    let requested = requests::post_response(&app, &endpoint, "", &payload).await;
    let reset_token = helpers::verification_token_of(&pool, "john_doe").await.unwrap();

    // Act
    let endpoint = format!("{}/users/reset-password", &app.url);
    let payload = json!({ "token": reset_token, "new_password": "brand_new_password" });
    let reset = requests::post_response(&app, &endpoint, "", &payload).await;

    // Assert
    assert!(requested.status().is_success());
    assert!(reset.status().is_success());

    let endpoint = format!("{}/users/login", &app.url);
    let old_login = requests::post_response(&app, &endpoint, "", &payload::login_user()).await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_credentials = json!({ "username": "john_doe", "password": "brand_new_password" });
    let new_login = requests::post_response(&app, &endpoint, "", &new_credentials).await;
    assert!(new_login.status().is_success());

    // The single-use token was consumed with the rehash.
    let endpoint = format!("{}/users/reset-password", &app.url);
    let replay = json!({ "token": reset_token, "new_password": "yet_another_password" });
    let replayed = requests::post_response(&app, &endpoint, "", &replay).await;
    assert_eq!(replayed.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn reset_request_for_unknown_email_should_be_not_found(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;

    // Act
    let endpoint = format!("{}/users/request-password-reset", &app.url);
    let payload = json!({ "email": "nobody@example.com" });
    let response = requests::post_response(&app, &endpoint, "", &payload).await;

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn subscription_status_should_report_free_tier_defaults(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool.clone()).await;
    let jwt = helpers::register_verified_user(&app, &pool).await;

    // Act
    let endpoint = format!("{}/users/subscription/status", &app.url);
    let response = requests::get_response(&app, &endpoint, &jwt).await;

    // Assert
    assert!(response.status().is_success());
    let status = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(status["result"]["is_premium"], json!(false));
    assert_eq!(status["result"]["subscription_status"], json!("inactive"));
    assert_eq!(status["result"]["api_usage_count"], json!(0));
    assert_eq!(status["result"]["api_usage_limit"], json!(10));
}

#[sqlx::test]
async fn subscription_status_requires_authentication(pool: PgPool) {
    // Arrange
    let app = TestApp::new(pool).await;

    // Act
    let response = app
        .client
        .get(format!("{}/users/subscription/status", &app.url))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
