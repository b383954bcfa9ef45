//! Account routes: registration, verification, login, password reset and
//! subscription info.

use crate::mail;
use crate::model::queries;
use crate::model::types::{LoginPayload, NewUser};
use crate::prelude::{AppState, AuthError, Error, Result, ValidationError};
use crate::web::auth::{Claims, password, token, verification};
use crate::web::middleware as mw;
use crate::web::types::*;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json};
use axum::{Router, middleware};
use secrecy::ExposeSecret;

pub fn routes(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/subscription/status", get(subscription_status))
        .route("/subscription/create-checkout", post(create_checkout))
        .route_layer(middleware::from_fn_with_state(app_state, mw::require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/verify", get(verify))
        .route("/login", post(login))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
        .route("/pricing", get(pricing))
        .merge(protected)
}

/// Creates a new, unverified user account.
///
/// Rejects duplicate usernames and emails with distinct, client-safe
/// messages. On success a verification email is dispatched in the background;
/// the response never waits for SMTP delivery.
///
/// # Errors
///
/// Returns an `Error` if the username or email is taken, or if hashing or the
/// database insert fails.
///
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = NewUser,
    tags = ["Users"],
    responses(
        (status = 200, body = UserResponse, description = "User registration completed"),
        (status = 400, body = String, description = "Duplicate username or email"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler",
	skip(app_state, new_user),
	fields(username = %new_user.username))]
pub async fn register(
    State(app_state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<Json<UserResponse>> {
    if queries::get_user_by_username(&app_state.pool, &new_user.username)
        .await?
        .is_some()
    {
        return Err(Error::Validation(ValidationError::DuplicateUsername));
    }
    if queries::get_user_by_email(&app_state.pool, &new_user.email)
        .await?
        .is_some()
    {
        return Err(Error::Validation(ValidationError::DuplicateEmail));
    }

    let password_hash = password::hash(new_user.plain_password.expose_secret(), &app_state.config)?;
    let verification_token = verification::generate();
    let user = queries::insert_user(
        &app_state.pool,
        &new_user.username,
        &new_user.email,
        &password_hash,
        &verification_token,
    )
    .await?;
    tracing::info!(target: "handler", user_id = %user.id, "User registered");

    let (subject, body) = mail::verification_email(&app_state.config.api_domain, &verification_token);
    mail::send_in_background(app_state.mailer.clone(), user.email.clone(), subject, body);

    Ok(Json(Response::new(user.into())))
}

/// Confirms an email address using the token from the verification link.
///
/// The token check and the verified-flag write are one atomic update, so a
/// token can be consumed at most once.
///
#[utoipa::path(
    get,
    path = "/users/verify",
    params(VerifyParams),
    tags = ["Users"],
    responses(
        (status = 200, body = MessageResponse, description = "Email verified"),
        (status = 400, body = String, description = "Invalid or expired token"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler", skip(app_state, params))]
pub async fn verify(
    State(app_state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<MessageResponse>> {
    let consumed = queries::consume_verification_token(&app_state.pool, &params.token).await?;
    if !consumed {
        return Err(Error::Auth(AuthError::VerificationToken));
    }
    tracing::info!(target: "handler", "Email verified");

    Ok(Json(Response::new("Email verified successfully".into())))
}

/// Authenticates a user and provides a JWT.
///
/// Unknown usernames and wrong passwords produce the same response, so the
/// endpoint cannot be used to enumerate accounts. An unverified account gets
/// a fresh verification token and a re-sent email instead of a JWT.
///
/// # Errors
///
/// Returns an `Error` if the credentials do not match, the email is not
/// verified yet, or JWT creation fails.
///
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginPayload,
    tags = ["Users"],
    responses(
        (status = 200, body = TokenResponse, description = "User login completed"),
        (status = 401, body = String, description = "Unauthorized"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler",
	skip(app_state, payload),
	fields(username = %payload.username))]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    let user = queries::get_user_by_username(&app_state.pool, &payload.username)
        .await?
        .ok_or(Error::Auth(AuthError::Login))?;
    password::verify(&user.password, payload.password.expose_secret(), &app_state.config)?;

    if !user.is_verified {
        // Re-issue the single-use token and re-send the confirmation email.
        let verification_token = verification::generate();
        queries::set_verification_token(&app_state.pool, user.id, &verification_token).await?;
        let (subject, body) =
            mail::verification_email(&app_state.config.api_domain, &verification_token);
        mail::send_in_background(app_state.mailer.clone(), user.email.clone(), subject, body);

        return Err(Error::Auth(AuthError::EmailNotVerified));
    }

    let token = token::create(&user.username, &app_state.config)?;
    tracing::info!(target: "handler", user_id = %user.id, "Token generated successfully");

    Ok(Json(Response::new(token.into())))
}

/// Issues a password reset token and emails the reset link.
///
/// The reset token reuses the verification token slot, so a reset request
/// invalidates any pending email verification and vice versa.
///
#[utoipa::path(
    post,
    path = "/users/request-password-reset",
    request_body = ResetRequestPayload,
    tags = ["Users"],
    responses(
        (status = 200, body = MessageResponse, description = "Reset email sent"),
        (status = 404, body = String, description = "Unknown email"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler", skip(app_state, payload))]
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetRequestPayload>,
) -> Result<Json<MessageResponse>> {
    let user = queries::get_user_by_email(&app_state.pool, &payload.email)
        .await?
        .ok_or(Error::NotFound("User for that email".to_owned()))?;

    let reset_token = verification::generate();
    queries::set_verification_token(&app_state.pool, user.id, &reset_token).await?;
    tracing::info!(target: "handler", user_id = %user.id, "Reset token issued");

    let (subject, body) = mail::reset_email(&app_state.config.api_domain, &reset_token);
    mail::send_in_background(app_state.mailer.clone(), user.email.clone(), subject, body);

    Ok(Json(Response::new("Password reset email sent".into())))
}

/// Consumes a reset token and stores the replacement password.
///
/// Rehash and token clearing happen in one atomic update keyed by the token.
///
#[utoipa::path(
    post,
    path = "/users/reset-password",
    request_body = ResetPayload,
    tags = ["Users"],
    responses(
        (status = 200, body = MessageResponse, description = "Password reset completed"),
        (status = 400, body = String, description = "Invalid or expired token"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler", skip(app_state, payload))]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPayload>,
) -> Result<Json<MessageResponse>> {
    let new_hash = password::hash(payload.new_password.expose_secret(), &app_state.config)?;
    let consumed = queries::consume_reset_token(&app_state.pool, &payload.token, &new_hash).await?;
    if !consumed {
        return Err(Error::Auth(AuthError::VerificationToken));
    }
    tracing::info!(target: "handler", "Password reset completed");

    Ok(Json(Response::new("Password reset successful".into())))
}

// -----------------------------------------------------------------------------

/// Returns the authenticated caller's subscription state and usage counters.
///
#[utoipa::path(
    get,
    path = "/users/subscription/status",
    security(("bearer_auth" = [])),
    tags = ["Users"],
    responses(
        (status = 200, body = SubscriptionResponse, description = "Subscription state"),
        (status = 401, body = String, description = "Unauthorized"),
        (status = 404, body = String, description = "User not found"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler",
	skip(app_state, claims),
	fields(username = %claims.sub))]
pub async fn subscription_status(
    State(app_state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SubscriptionResponse>> {
    let user = queries::get_user_by_username(&app_state.pool, &claims.sub)
        .await?
        .ok_or(Error::NotFound(format!("User {}", claims.sub)))?;

    Ok(Json(Response::new(SubscriptionPayload {
        is_premium: user.is_premium,
        subscription_status: user.subscription_status(),
        api_usage_count: user.api_usage_count,
        api_usage_limit: user.api_usage_limit,
    })))
}

/// Returns the provider checkout details for the configured product.
///
#[utoipa::path(
    post,
    path = "/users/subscription/create-checkout",
    security(("bearer_auth" = [])),
    tags = ["Users"],
    responses(
        (status = 200, body = CheckoutResponse, description = "Checkout details"),
        (status = 401, body = String, description = "Unauthorized"),
        (status = 404, body = String, description = "User not found"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler",
	skip(app_state, claims),
	fields(username = %claims.sub))]
pub async fn create_checkout(
    State(app_state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<CheckoutResponse>> {
    let user = queries::get_user_by_username(&app_state.pool, &claims.sub)
        .await?
        .ok_or(Error::NotFound(format!("User {}", claims.sub)))?;

    let checkout_url = format!(
        "https://buy.paddle.com/product/{}",
        app_state.config.paddle_product_id
    );

    Ok(Json(Response::new(CheckoutPayload {
        checkout_url,
        customer_email: user.email,
        user_id: user.id,
    })))
}

/// Returns the public plan catalog.
///
#[utoipa::path(
    get,
    path = "/users/pricing",
    tags = ["Users"],
    responses(
        (status = 200, body = Response<Vec<PricingPlan>>, description = "Available plans")
    )
)]
pub async fn pricing() -> Json<Response<Vec<PricingPlan>>> {
    Json(Response::new(vec![
        PricingPlan {
            name: "Free".to_owned(),
            price: 0.0,
            api_calls: "10".to_owned(),
            features: vec![
                "Basic sentiment analysis".to_owned(),
                "Email verification".to_owned(),
            ],
        },
        PricingPlan {
            name: "Premium".to_owned(),
            price: 9.99,
            api_calls: "unlimited".to_owned(),
            features: vec![
                "Unlimited sentiment analysis".to_owned(),
                "Advanced tone analysis".to_owned(),
                "Priority support".to_owned(),
            ],
        },
    ]))
}
