use serde::{Deserialize, Serialize};

/// Claims embedded in the bearer token. The subject is the username.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub mod password {
    use crate::config::Config;
    use crate::prelude::{AuthError, Error, Result};
    use argon2::{ThreadMode, Variant, Version};
    use rand::Rng;
    use secrecy::ExposeSecret;

    pub fn hash(password: &str, config: &Config) -> Result<String> {
        let salt = rand::rng().random::<[u8; 16]>();
        let argon_config = argon2::Config {
            ad: &[],
            hash_length: 32,
            lanes: 4,
            thread_mode: ThreadMode::Sequential,
            mem_cost: (u16::MAX as u32) + 1,
            secret: config.password_secret.expose_secret().as_bytes(),
            time_cost: 10,
            variant: Variant::Argon2id,
            version: Version::Version13,
        };
        argon2::hash_encoded(password.as_bytes(), &salt, &argon_config).map_err(Error::Hash)
    }

    pub fn verify(hash: &str, password: &str, config: &Config) -> Result<()> {
        let secret = config.password_secret.expose_secret().as_bytes();
        match argon2::verify_encoded_ext(hash, password.as_bytes(), secret, &[])? {
            true => Ok(()),
            false => Err(Error::Auth(AuthError::Login)),
        }
    }
}

pub mod token {
    use super::Claims;
    use crate::config::Config;
    use crate::prelude::{AuthError, Error, Result};
    use chrono::{Duration, Utc};
    use jsonwebtoken::errors::ErrorKind;
    use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
    use secrecy::ExposeSecret;

    pub fn create(username: &str, config: &Config) -> Result<String> {
        let now = Utc::now();
        let expires_in = Duration::seconds(config.token_duration_sec as i64);
        let claims = Claims {
            sub: username.to_owned(),
            exp: (now + expires_in).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let secret = config.token_secret.expose_secret().as_bytes();
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|_| Error::Auth(AuthError::Token))
    }

    pub fn validate(token: &str, config: &Config) -> Result<Claims> {
        let secret = config.token_secret.expose_secret().as_bytes();
        let decoding_key = DecodingKey::from_secret(secret);

        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => Error::Auth(AuthError::TokenExpired),
                _ => Error::Auth(AuthError::Token),
            })
    }
}

pub mod verification {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use rand::Rng;

    /// Generates a single-use, URL-safe token carrying 32 bytes of entropy.
    ///
    pub fn generate() -> String {
        let bytes = rand::rng().random::<[u8; 32]>();
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

// -----------------------------------------------------------------------------
