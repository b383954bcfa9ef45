use crate::config::Config;
use crate::model::types::{DbAnalysis, DbUser, SubscriptionStatus};
use crate::prelude::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Creates and returns a connection pool to the database.
///
#[tracing::instrument(level = "trace", target = "database", skip(config))]
pub async fn connect_to_db(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new().connect(&config.database_url).await?;

    Ok(pool)
}

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<Option<DbUser>> {
    Ok(
        sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<DbUser>> {
    Ok(
        sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_user_by_subscription_id(
    pool: &PgPool,
    subscription_id: &str,
) -> Result<Option<DbUser>> {
    Ok(
        sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE subscription_id = $1")
            .bind(subscription_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Inserts a new, unverified user into the database.
///
/// # Arguments
///
/// * `pool`: Reference to the `PgPool`.
/// * `username` / `email`: Unique user identity.
/// * `password_hash`: Already-hashed password to be stored.
/// * `verification_token`: Fresh single-use token for the email confirmation
///   link.
///
/// # Returns
///
/// `DbUser` struct representing the newly created row.
///
pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    verification_token: &str,
) -> Result<DbUser> {
    Ok(sqlx::query_as::<_, DbUser>(
        r#"
INSERT INTO users (username, email, password, verification_token)
VALUES ($1, $2, $3, $4)
RETURNING *
		"#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(verification_token)
    .fetch_one(pool)
    .await?)
}

/// Stores a fresh verification/reset token on a user row, replacing any
/// pending one.
///
pub async fn set_verification_token(pool: &PgPool, user_id: Uuid, token: &str) -> Result<()> {
    sqlx::query("UPDATE users SET verification_token = $2 WHERE id = $1")
        .bind(user_id)
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

/// Marks a user as verified and clears the token in one conditional update.
///
/// The token lookup and the clearing write are a single statement, so two
/// concurrent requests holding the same token cannot both succeed.
///
/// # Returns
///
/// `true` if a row was consumed, `false` when the token matched nothing.
///
pub async fn consume_verification_token(pool: &PgPool, token: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
UPDATE users SET is_verified = TRUE, verification_token = NULL
WHERE verification_token = $1 AND is_verified = FALSE
		"#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replaces a user's password hash and clears the reset token in one
/// conditional update. Same compare-and-clear contract as
/// [`consume_verification_token`].
///
pub async fn consume_reset_token(pool: &PgPool, token: &str, new_hash: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
UPDATE users SET password = $2, verification_token = NULL
WHERE verification_token = $1
		"#,
    )
    .bind(token)
    .bind(new_hash)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// -----------------------------------------------------------------------------

/// Activates a subscription for the user owning `email` and stores the
/// provider identifiers.
///
/// # Returns
///
/// `true` if a user with that email exists.
///
pub async fn start_subscription(
    pool: &PgPool,
    email: &str,
    subscription_id: &str,
    plan_id: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
UPDATE users SET
    subscription_id = $2,
    plan_id = $3,
    subscription_status = 'active',
    is_premium = TRUE,
    subscribed_at = now()
WHERE email = $1
		"#,
    )
    .bind(email)
    .bind(subscription_id)
    .bind(plan_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Applies the status reported by a subscription update event. The premium
/// flag follows the status.
///
pub async fn update_subscription_status(
    pool: &PgPool,
    subscription_id: &str,
    status: SubscriptionStatus,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
UPDATE users SET subscription_status = $2, is_premium = $3
WHERE subscription_id = $1
		"#,
    )
    .bind(subscription_id)
    .bind(status.as_str())
    .bind(status == SubscriptionStatus::Active)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Cancels the subscription and records the end timestamp. Idempotent: the
/// resulting state is the same no matter how often the event is replayed.
///
pub async fn cancel_subscription(pool: &PgPool, subscription_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
UPDATE users SET
    subscription_status = 'cancelled',
    is_premium = FALSE,
    cancelled_at = COALESCE(cancelled_at, now())
WHERE subscription_id = $1
		"#,
    )
    .bind(subscription_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// -----------------------------------------------------------------------------

/// Persists one analysis result for a user. Rows are immutable after this
/// insert.
///
pub async fn insert_analysis(
    pool: &PgPool,
    user_id: Uuid,
    email_text: &str,
    sentiment: Option<&str>,
    tone: Option<&str>,
) -> Result<DbAnalysis> {
    Ok(sqlx::query_as::<_, DbAnalysis>(
        r#"
INSERT INTO email_analyses (user_id, email_text, sentiment, tone)
VALUES ($1, $2, $3, $4)
RETURNING *
		"#,
    )
    .bind(user_id)
    .bind(email_text)
    .bind(sentiment)
    .bind(tone)
    .fetch_one(pool)
    .await?)
}

pub async fn get_analyses_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<DbAnalysis>> {
    Ok(sqlx::query_as::<_, DbAnalysis>(
        "SELECT * FROM email_analyses WHERE user_id = $1 ORDER BY analyzed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
