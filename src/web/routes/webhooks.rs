//! Payment provider webhook endpoint.
//!
//! Receives the raw body, since the signature scheme covers the exact
//! received bytes and verifying a re-serialized body would be a weaker check.

use crate::config::Config;
use crate::paddle::{self, signature};
use crate::prelude::{AppState, Error, Result, WebhookError};
use crate::services::subscription;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

pub fn routes() -> Router<AppState> {
    Router::new().route("/paddle", post(paddle))
}

/// Handles subscription lifecycle events from the payment provider.
///
/// Two historical authentication variants are supported: the signed-header
/// scheme over the raw body, and the legacy API-key header. Requests carrying
/// neither, or failing their check, are rejected. Once authenticated the
/// provider always gets a success acknowledgment, otherwise it would retry
/// the event indefinitely; processing failures are logged only.
///
#[utoipa::path(
    post,
    path = "/webhooks/paddle",
    tags = ["Webhooks"],
    request_body = String,
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 400, body = String, description = "Unauthenticated webhook")
    )
)]
#[tracing::instrument(level = "trace", target = "handler", skip(app_state, headers, body))]
pub async fn paddle(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    authenticate(&app_state.config, &headers, &body)?;

    if let Err(error) = process(&app_state, &body).await {
        tracing::error!(target: "handler", ?error, "Webhook processing failed");
    }

    Ok(StatusCode::OK)
}

/// Checks the request against both authentication variants.
///
fn authenticate(config: &Config, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    if let Some(header) = headers
        .get("Paddle-Signature")
        .and_then(|value| value.to_str().ok())
    {
        let secret = config.paddle_webhook_secret.expose_secret();
        return match signature::verify(secret, header, body) {
            true => Ok(()),
            false => Err(Error::Webhook(WebhookError::Signature)),
        };
    }

    if let Some(key) = headers
        .get("Paddle-Api-Key")
        .and_then(|value| value.to_str().ok())
    {
        let expected = config.paddle_api_key.expose_secret();
        return match bool::from(key.as_bytes().ct_eq(expected.as_bytes())) {
            true => Ok(()),
            false => Err(Error::Webhook(WebhookError::ApiKey)),
        };
    }

    Err(Error::Webhook(WebhookError::Unauthenticated))
}

async fn process(app_state: &AppState, body: &[u8]) -> Result<()> {
    let payload: serde_json::Value = serde_json::from_slice(body)?;
    let event = paddle::parse_event(&payload);
    tracing::info!(target: "handler", kind = %event.kind, "Webhook event received");

    subscription::apply(&app_state.pool, &event).await
}
