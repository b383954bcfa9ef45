use crate::prelude::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};

/// Represents the application's configuration.
///
/// Loaded once at startup and carried inside the application state; no
/// component reads the environment after that point.
///
#[derive(Debug, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_domain: String,

    pub password_secret: SecretString,
    pub token_secret: SecretString,
    pub token_duration_sec: u64,

    pub openai_url: String,
    pub openai_api_key: SecretString,
    pub openai_model: String,

    pub paddle_webhook_secret: SecretString,
    pub paddle_api_key: SecretString,
    pub paddle_product_id: String,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: SecretString,
    pub mail_from: String,
}

impl Config {
    /// Loads the configuration from environment variables.
    ///
    pub fn from_env() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            tracing::info!(target: "config", ".env loaded.");
        }

        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize::<Config>()?;
        tracing::info!(target: "config", "Configuration loaded.");

        Ok(config)
    }

    /// Returns the socket address for the application server to bind to.
    ///
    pub fn get_address(&self) -> Result<SocketAddr> {
        let (host, port) = (self.host.as_str(), self.port);
        (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or(Error::NotFound(format!("IP Address for {}:{}", host, port)))
    }
}
