use mailtone::app::App;
use mailtone::config::Config;
use mailtone::mail::smtp::SmtpMailer;
use mailtone::model::queries;
use mailtone::openai::client::OpenAiClient;
use mailtone::prelude::{AppState, Result};
use mailtone::telemetry;
use std::sync::Arc;
use tracing::Level;

/// The main entry point for the server application.
///
#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = telemetry::get_subscriber(Level::INFO, std::io::stdout);
    telemetry::init_subscriber(subscriber)?;

    let config = Arc::new(Config::from_env()?);
    let address = config.get_address()?;

    let pool = queries::connect_to_db(&config).await?;
    sqlx::migrate!().run(&pool).await?;

    let completions = Arc::new(OpenAiClient::new(
        config.openai_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let mailer = Arc::new(SmtpMailer::new(&config)?);
    let app_state = AppState {
        pool,
        config,
        completions,
        mailer,
    };

    let app = App::build(app_state, address).await?;
    tracing::info!(target: "server", "Listening on '{}'\n", app.get_url()?);

    app.run().await
}
