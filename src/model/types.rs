use chrono::{DateTime, Utc};
use derive_more::Display;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Represents a user row in the database, including the password hash and the
/// pending verification/reset token.
///
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub subscription_id: Option<String>,
    pub plan_id: Option<String>,
    pub subscription_status: String,
    pub is_premium: bool,
    pub api_usage_count: i32,
    pub api_usage_limit: i32,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl DbUser {
    pub fn subscription_status(&self) -> SubscriptionStatus {
        SubscriptionStatus::from(self.subscription_status.as_str())
    }
}

/// Represents a user that is safe to expose to the public API.
///
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for ApiUser {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Payload for creating a new user, contains the plaintext password.
///
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(rename = "password")]
    #[schema(value_type = String)]
    pub plain_password: SecretString,
}

/// Payload for authentication an existing user.
///
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginPayload {
    pub username: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

// -----------------------------------------------------------------------------

/// Represents the subscription state stored on the `users` table.
///
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Inactive,
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    /// Lowercase form used for the database column.
    ///
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "active" => SubscriptionStatus::Active,
            // Both provider generations spell cancellation differently.
            "cancelled" | "canceled" | "deleted" => SubscriptionStatus::Cancelled,
            _ => SubscriptionStatus::Inactive,
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

// -----------------------------------------------------------------------------

/// Represents a stored analysis row in the database.
///
#[derive(Debug, Clone, FromRow)]
pub struct DbAnalysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email_text: String,
    pub sentiment: Option<String>,
    pub tone: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Represents an analysis that is safe to expose to the public API.
///
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiAnalysis {
    pub id: Uuid,
    pub email_text: String,
    pub sentiment: Option<String>,
    pub tone: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl From<DbAnalysis> for ApiAnalysis {
    fn from(analysis: DbAnalysis) -> Self {
        Self {
            id: analysis.id,
            email_text: analysis.email_text,
            sentiment: analysis.sentiment,
            tone: analysis.tone,
            analyzed_at: analysis.analyzed_at,
        }
    }
}
