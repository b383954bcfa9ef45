pub mod smtp;

// -----------------------------------------------------------------------------

use crate::prelude::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract interface over the outbound mail transport.
///
#[async_trait]
pub trait Mailer {
    /// Performs a best-effort delivery of one plain-text message.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Dispatches a send without blocking the calling handler.
///
/// Delivery failures are logged and never fail the request that triggered
/// them.
///
pub fn send_in_background(
    mailer: Arc<dyn Mailer + Send + Sync>,
    to: String,
    subject: String,
    body: String,
) {
    tokio::spawn(async move {
        if let Err(error) = mailer.send(&to, &subject, &body).await {
            tracing::error!(target: "mail", ?error, "Failed to send email");
        }
    });
}

// -----------------------------------------------------------------------------

/// Builds the confirmation message carrying the verification link.
///
pub fn verification_email(api_domain: &str, token: &str) -> (String, String) {
    let link = format!("{}/users/verify?token={}", api_domain, token);
    (
        "Verify your email".to_owned(),
        format!(
            "Please verify your email by clicking the following link: {}",
            link
        ),
    )
}

/// Builds the password reset message.
///
pub fn reset_email(api_domain: &str, token: &str) -> (String, String) {
    let link = format!("{}/users/reset-password?token={}", api_domain, token);
    (
        "Reset your password".to_owned(),
        format!(
            "Please reset your password by clicking the following link: {}",
            link
        ),
    )
}
