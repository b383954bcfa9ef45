use crate::config::Config;
use crate::mail::Mailer;
use crate::openai::Completions;
use sqlx::PgPool;
use std::fmt::{Debug, Formatter, Result};
use std::sync::Arc;

/// Holds the application's shared state across Axum handlers: the database
/// connection pool, the immutable configuration, and the two outbound
/// collaborators (completion service and mail transport).
///
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub completions: Arc<dyn Completions + Send + Sync>,
    pub mailer: Arc<dyn Mailer + Send + Sync>,
}

impl Debug for AppState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("AppState")
            .field("Pool", &self.pool)
            .field("Config", &self.config)
            .field("Completions", &"Arc<dyn Completions>")
            .field("Mailer", &"Arc<dyn Mailer>")
            .finish()
    }
}
