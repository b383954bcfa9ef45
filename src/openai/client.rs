use crate::openai::Completions;
use crate::prelude::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

/// Concrete implementation of the `Completions` trait using the `reqwest`
/// crate against an OpenAI-compatible chat completion API.
///
pub struct OpenAiClient {
    client: OnceCell<Client>,
    url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiClient {
    /// Creates a new instance of the completion client.
    ///
    /// # Arguments
    ///
    /// * `url`: Base URL of the completion API.
    /// * `api_key`: Bearer key for the `Authorization` header.
    /// * `model`: Model identifier to request.
    ///
    pub fn new(url: String, api_key: SecretString, model: String) -> Self {
        Self {
            client: OnceCell::new(),
            url,
            api_key,
            model,
        }
    }

    /// Lazily initializes and returns a reference to the `reqwest::Client`.
    ///
    /// If the client has not been initialized yet, it will be built on the
    /// first call with the Authorization header preconfigured and marked
    /// sensitive. Subsequent calls return the existing client.
    ///
    async fn get_client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                let bearer = format!("Bearer {}", self.api_key.expose_secret());
                let mut auth_header = HeaderValue::from_str(&bearer)?;
                auth_header.set_sensitive(true);

                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, auth_header);

                Client::builder()
                    .default_headers(headers)
                    .build()
                    .map_err(Error::from)
            })
            .await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl Completions for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let client = self.get_client().await?;
        let url = format!("{}/chat/completions", self.url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 50,
        };

        let response = client.post(&url).json(&request).send().await?;
        match response.status() {
            status if status.is_success() => response
                .json::<ChatResponse>()
                .await?
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content.trim().to_owned())
                .ok_or_else(|| Error::Completion(status, "no choices in response".to_owned())),
            status => {
                let text = response.text().await?;
                Err(Error::Completion(status, text))
            }
        }
    }
}
