use crate::model::queries;
use crate::model::types::SubscriptionStatus;
use crate::prelude::{AppState, AuthError, Error, Result};
use crate::web::auth::{Claims, token};
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::CorsLayer;

/// Prints a blank line after each response as a visual separator between
/// requests in the development console logs.
///
pub async fn log_mapper(res: Response) -> Response {
    #[cfg(debug_assertions)]
    println!();

    res
}

/// Axum middleware requiring a valid bearer token.
///
/// Pulls the token from the `Authorization` header, validates it against the
/// configured signing secret and stores the decoded [`Claims`] in the request
/// extensions for the handlers downstream.
///
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|slice| slice.strip_prefix("Bearer "))
        .ok_or(Error::Auth(AuthError::Token))?;

    let claims = token::validate(token, &app_state.config)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Axum middleware gating premium functionality on subscription state.
///
/// Reloads the caller's user row on every request and requires an `active`
/// subscription status; no other field is consulted. Because nothing is
/// cached, a webhook-driven status change takes effect on the very next
/// request.
///
pub async fn require_subscription(
    State(app_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(Error::Auth(AuthError::Token))?;

    let user = queries::get_user_by_username(&app_state.pool, &claims.sub)
        .await?
        .ok_or(Error::NotFound(format!("User {}", claims.sub)))?;
    if user.subscription_status() != SubscriptionStatus::Active {
        return Err(Error::Auth(AuthError::SubscriptionRequired));
    }

    Ok(next.run(request).await)
}

/// CORS policy for the local frontend during development.
///
pub fn allow_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin("http://localhost:5173".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
