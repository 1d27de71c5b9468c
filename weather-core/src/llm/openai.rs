use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use tracing::debug;

use super::{LanguageModel, ModelRequest, ModelResponse};
use crate::http::truncate_body;

/// Client for the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiResponsesClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for OpenAiResponsesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiResponsesClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiResponsesClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for OpenAiResponsesClient {
    async fn respond(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let endpoint = self.endpoint();
        debug!(model = %request.model, tools = request.tools.len(), "POST {endpoint}");

        let res = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .with_context(|| format!("POST {endpoint} failed"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenAI response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenAI request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse OpenAI response JSON")
    }
}
