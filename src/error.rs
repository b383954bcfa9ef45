use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Defines the application's custom error types.
///
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error: {0}")]
    Any(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(ValidationError),
    #[error("Authentication error: {0}")]
    Auth(AuthError),
    #[error("Webhook rejected: {0}")]
    Webhook(WebhookError),
    #[error("Completion API error: status {0}, body: {1}")]
    Completion(reqwest::StatusCode, String),
    #[error("Header convert error: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),

    #[error("Environment error: {0}")]
    Environment(#[from] dotenv::Error),
    #[error("Environment variable error: {0}")]
    EnvironmentVariable(#[from] std::env::VarError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to set logger: {0}")]
    Logger(#[from] tracing::log::SetLoggerError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    InputOutput(#[from] std::io::Error),
    #[error("Hash error: {0}")]
    Hash(#[from] argon2::Error),
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] tracing::dispatcher::SetGlobalDefaultError),
    #[error("Address parse error: {0}")]
    ParseAddr(#[from] std::net::AddrParseError),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Mail transport error: {0}")]
    MailTransport(#[from] lettre::transport::smtp::Error),
    #[error("Mail message error: {0}")]
    MailMessage(#[from] lettre::error::Error),
    #[error("Mail address error: {0}")]
    MailAddress(#[from] lettre::address::AddressError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Error::Auth(AuthError::Token | AuthError::TokenExpired) => (
                StatusCode::UNAUTHORIZED,
                "Authorization token is missing or invalid!".to_owned(),
            ),
            Error::Auth(AuthError::Login) | Error::Hash(_) => (
                StatusCode::UNAUTHORIZED,
                "Incorrect username or password!".to_owned(),
            ),
            Error::Auth(AuthError::EmailNotVerified) => (
                StatusCode::UNAUTHORIZED,
                "Email not verified. A new verification email has been sent.".to_owned(),
            ),
            Error::Auth(AuthError::VerificationToken) => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired token!".to_owned(),
            ),
            Error::Auth(AuthError::SubscriptionRequired) => (
                StatusCode::FORBIDDEN,
                "Active subscription required to access this feature!".to_owned(),
            ),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not found!".to_owned()),
            Error::Webhook(_) => (StatusCode::BAD_REQUEST, "Webhook rejected!".to_owned()),
            Error::Completion(..)
            | Error::Reqwest(_)
            | Error::MailTransport(_)
            | Error::MailMessage(_)
            | Error::MailAddress(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream service error!".to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error!".to_owned(),
            ),
        }
        .into_response()
    }
}

/// Represents authentication and authorization errors.
///
#[derive(Debug, Display)]
pub enum AuthError {
    // Bearer token is missing or failed the signature check.
    Token,
    // Bearer token expiry has passed.
    TokenExpired,
    // Unknown username or wrong password, indistinguishable on purpose.
    Login,
    EmailNotVerified,
    // Single-use verification/reset token did not match any row.
    VerificationToken,
    SubscriptionRequired,
}

/// Represents input validation errors, safe to show to the client.
///
#[derive(Debug, Display)]
pub enum ValidationError {
    #[display("Username already registered")]
    DuplicateUsername,
    #[display("Email already registered")]
    DuplicateEmail,
}

/// Represents errors raised while authenticating an inbound webhook.
///
#[derive(Debug, Display)]
pub enum WebhookError {
    Unauthenticated,
    Signature,
    ApiKey,
}
