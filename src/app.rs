use crate::model;
use crate::prelude::{AppState, Result};
use crate::web::middleware as mw;
use crate::web::routes::{sentiment, users, webhooks};
use crate::web;
use axum::serve::Serve;
use axum::{Router, middleware};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa_swagger_ui::SwaggerUi;

/// Represents the core web application.
///
pub struct App {
    server: Serve<TcpListener, Router, Router>,
}

impl App {
    /// Builds the full Axum router and binds the listener, without serving.
    ///
    /// # Arguments
    ///
    /// * `app_state` - Shared state for the application.
    /// * `address` - Socket address to bind to. Port 0 picks a random free
    ///   port, which the integration tests rely on.
    ///
    pub async fn build(app_state: AppState, address: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(&address).await?;
        let router = Router::new()
            .nest("/users", users::routes(app_state.clone()))
            .nest("/sentiment", sentiment::routes(app_state.clone()))
            .nest("/webhooks", webhooks::routes())
            .merge(SwaggerUi::new("/openapi").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .with_state(app_state)
            .layer(middleware::map_response(mw::log_mapper))
            .layer(mw::allow_cors());

        Ok(Self {
            server: axum::serve(listener, router),
        })
    }

    /// Consumes the `App` and serves requests until shutdown or error.
    ///
    pub async fn run(self) -> Result<()> {
        self.server.await.map_err(Into::into)
    }

    /// Returns the URL the bound listener is reachable at.
    ///
    pub fn get_url(&self) -> Result<String> {
        Ok(format!("http://{}", self.server.local_addr()?))
    }
}

/// API documentation for the application.
///
/// This struct defines the OpenAPI specification for the entire application,
/// including all paths, components (schemas), and security schemes.
/// It is used by `utoipa` to generate the OpenAPI JSON and Swagger UI.
///
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        users::register,
        users::verify,
        users::login,
        users::request_password_reset,
        users::reset_password,
        users::subscription_status,
        users::create_checkout,
        users::pricing,
        sentiment::analyze,
        sentiment::list_analyses,
        webhooks::paddle,
    ),
    components(schemas(
        model::types::NewUser,
        model::types::LoginPayload,
        model::types::ApiUser,
        model::types::ApiAnalysis,
        model::types::SubscriptionStatus,
        web::types::AnalyzePayload,
        web::types::ResetRequestPayload,
        web::types::ResetPayload,
        web::types::TokenResponse,
        web::types::UserResponse,
        web::types::MessageResponse,
    )),
    modifiers(&JwtSecurity)
)]
struct ApiDoc;

/// Modifier to add JWT Bearer authentication scheme to the OpenAPI documentation.
///
/// This struct implements the `utoipa::Modify` trait to programmatically add
/// a security scheme named "bearer_auth" to the generated OpenAPI specification.
/// This scheme uses HTTP Bearer authentication.
///
struct JwtSecurity;
impl utoipa::Modify for JwtSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}
