// Generative text API client

pub mod error;
pub mod profile;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::ApiError;
pub use profile::ProfileClient;

use crate::grammar::parser::{grammar_prompt, parse_check_response};
use crate::grammar::{CheckResult, GrammarBackend};

/// Build the shared HTTP client. Without a timeout reqwest waits indefinitely.
pub fn http_client(request_timeout_secs: Option<u64>) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(secs) = request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Turn non-2xx responses into classified errors.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status, body))
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
    }
}

impl GeminiClient {
    pub const fn new(url: String, api_key: Option<String>, client: Client) -> Self {
        Self {
            url,
            api_key,
            client,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&GenerateContentRequest::from_prompt(prompt));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = ensure_success(request.send().await?).await?;

        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        body.text()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode("response has no candidate text".to_string()))
    }
}

#[async_trait]
impl GrammarBackend for GeminiClient {
    async fn check_grammar(&self, text: &str) -> Result<CheckResult, ApiError> {
        let raw = self.generate(&grammar_prompt(text)).await?;
        Ok(parse_check_response(text, &raw))
    }
}
