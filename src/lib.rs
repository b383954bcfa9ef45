pub mod app;
pub mod config;
pub mod error;
pub mod mail;
pub mod model;
pub mod openai;
pub mod paddle;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;

pub mod prelude {
    pub use crate::error::{AuthError, Error, Result, ValidationError, WebhookError};
    pub use crate::state::AppState;

    pub use crate::mail::Mailer;
    pub use crate::openai::Completions;
}
