use crate::model::types::{ApiAnalysis, ApiUser, SubscriptionStatus};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// API response with JWT inside.
///
pub type TokenResponse = Response<TokenPayload>;

/// API response with user info inside.
///
pub type UserResponse = Response<ApiUser>;

/// API response carrying a human-readable acknowledgment.
///
pub type MessageResponse = Response<MessagePayload>;

/// API response with the outcome of one analysis inside.
///
pub type AnalysisResponse = Response<AnalysisPayload>;

/// API response with the caller's stored analyses inside.
///
pub type AnalysesResponse = Response<Vec<ApiAnalysis>>;

/// API response describing the caller's subscription.
///
pub type SubscriptionResponse = Response<SubscriptionPayload>;

/// API response with the provider checkout details inside.
///
pub type CheckoutResponse = Response<CheckoutPayload>;

/// Generic API response.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Response<T> {
    pub result: T,
}

impl<T> Response<T> {
    /// Creates a new instance of the API response.
    ///
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// Payload for successful registration or login, containing `JWT`.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPayload {
    pub token: String,
}

impl From<String> for TokenPayload {
    fn from(token: String) -> Self {
        Self { token }
    }
}

/// Payload carrying a plain acknowledgment message.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessagePayload {
    pub message: String,
}

impl From<&str> for MessagePayload {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------------

/// Query parameters for the email verification link.
///
#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyParams {
    pub token: String,
}

/// Payload requesting a password reset link.
///
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetRequestPayload {
    pub email: String,
}

/// Payload consuming a reset token with the replacement password.
///
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPayload {
    pub token: String,
    #[schema(value_type = String)]
    pub new_password: SecretString,
}

// -----------------------------------------------------------------------------

/// Payload for submitting a text for analysis.
///
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzePayload {
    pub email_text: String,
}

/// Payload with the derived labels and the persisted timestamp.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisPayload {
    pub sentiment: Option<String>,
    pub tone: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

// -----------------------------------------------------------------------------

/// Payload describing the caller's subscription and usage.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionPayload {
    pub is_premium: bool,
    pub subscription_status: SubscriptionStatus,
    pub api_usage_count: i32,
    pub api_usage_limit: i32,
}

/// Payload pointing the caller at the provider checkout page.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutPayload {
    pub checkout_url: String,
    pub customer_email: String,
    pub user_id: Uuid,
}

/// One entry of the public plan catalog.
///
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PricingPlan {
    pub name: String,
    pub price: f64,
    pub api_calls: String,
    pub features: Vec<String>,
}
