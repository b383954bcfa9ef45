//! Analysis routes, protected by authentication and the subscription gate.

use crate::model::queries;
use crate::model::types::ApiAnalysis;
use crate::openai;
use crate::prelude::{AppState, Error, Result};
use crate::web::auth::Claims;
use crate::web::middleware as mw;
use crate::web::types::*;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json};
use axum::{Router, middleware};

pub fn routes(app_state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/analyze", post(analyze))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw::require_subscription,
        ));

    Router::new()
        .route("/analyses", get(list_analyses))
        .merge(gated)
        .route_layer(middleware::from_fn_with_state(app_state, mw::require_auth))
}

/// Labels a text's sentiment and tone via the external completion service and
/// persists the result for the caller.
///
/// The completion is requested exactly once, without retries or streaming,
/// and its free-form text is parsed heuristically: the first line mentioning
/// `sentiment` and the first mentioning `tone` supply the labels. Responses
/// matching neither leave the labels empty.
///
/// # Errors
///
/// Returns an `Error` when the completion call or a database operation fails.
///
#[utoipa::path(
    post,
    path = "/sentiment/analyze",
    request_body = AnalyzePayload,
    security(("bearer_auth" = [])),
    tags = ["Sentiment"],
    responses(
        (status = 200, body = AnalysisResponse, description = "Analysis stored"),
        (status = 401, body = String, description = "Unauthorized"),
        (status = 403, body = String, description = "Subscription required"),
        (status = 502, body = String, description = "Completion service failure"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler",
	skip(app_state, claims, payload),
	fields(username = %claims.sub))]
pub async fn analyze(
    State(app_state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AnalyzePayload>,
) -> Result<Json<AnalysisResponse>> {
    let user = queries::get_user_by_username(&app_state.pool, &claims.sub)
        .await?
        .ok_or(Error::NotFound(format!("User {}", claims.sub)))?;

    let prompt = format!(
        "Analyze the following email for sentiment and tone. \
         Return both as short labels.\n\nEmail:\n{}",
        payload.email_text
    );
    let completion = app_state.completions.complete(&prompt).await?;
    let (sentiment, tone) = openai::extract_labels(&completion);

    let analysis = queries::insert_analysis(
        &app_state.pool,
        user.id,
        &payload.email_text,
        sentiment.as_deref(),
        tone.as_deref(),
    )
    .await?;
    tracing::info!(target: "handler", analysis_id = %analysis.id, "Analysis stored");

    Ok(Json(Response::new(AnalysisPayload {
        sentiment: analysis.sentiment,
        tone: analysis.tone,
        analyzed_at: analysis.analyzed_at,
    })))
}

/// Returns the caller's stored analyses, newest first.
///
#[utoipa::path(
    get,
    path = "/sentiment/analyses",
    security(("bearer_auth" = [])),
    tags = ["Sentiment"],
    responses(
        (status = 200, body = AnalysesResponse, description = "Analyses found"),
        (status = 401, body = String, description = "Unauthorized"),
        (status = 404, body = String, description = "User not found"),
        (status = 500, body = String, description = "Internal server error")
    )
)]
#[tracing::instrument(level = "trace", target = "handler",
	skip(app_state, claims),
	fields(username = %claims.sub))]
pub async fn list_analyses(
    State(app_state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AnalysesResponse>> {
    let user = queries::get_user_by_username(&app_state.pool, &claims.sub)
        .await?
        .ok_or(Error::NotFound(format!("User {}", claims.sub)))?;

    let analyses = queries::get_analyses_for_user(&app_state.pool, user.id).await?;
    tracing::info!(target: "handler", count = analyses.len(), "Found analyses");

    Ok(Json(Response::new(
        analyses.into_iter().map(ApiAnalysis::from).collect(),
    )))
}
