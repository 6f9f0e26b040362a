// Random profile API client

use reqwest::Client;
use serde::Deserialize;

use super::{ensure_success, ApiError};
use crate::models::Profile;

#[derive(Debug, Clone)]
pub struct ProfileClient {
    url: String,
    client: Client,
}

/// Response body; the `info` paging block is ignored.
#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    results: Vec<Profile>,
}

impl ProfileClient {
    pub const fn new(url: String, client: Client) -> Self {
        Self { url, client }
    }

    /// Fetch one generated profile.
    pub async fn fetch(&self) -> Result<Profile, ApiError> {
        let response = ensure_success(self.client.get(&self.url).send().await?).await?;

        let envelope = response
            .json::<ProfileEnvelope>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        envelope
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode("profile response has no results".to_string()))
    }
}
