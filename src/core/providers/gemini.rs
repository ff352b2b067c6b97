//! Gemini single-turn generation client
//!
//! Owns the upstream leg of the `/api/gemini` endpoint: request
//! building, the keyed endpoint URL, the bounded HTTP call, and
//! status passthrough. Successful bodies are returned verbatim —
//! callers are expected to know the provider's response schema.

use crate::core::error::ProxyError;
use crate::models::gemini::{ContentBlock, GenerateContentRequest};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Client for the Gemini `generateContent` API
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL (overridable so tests can stub it)
    /// * `model` - model identifier embedded in the endpoint path
    /// * `timeout` - request timeout in seconds
    pub fn new(base_url: String, model: String, timeout: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            model,
        }
    }

    /// Build the upstream request: the prompt as a single content
    /// block plus a separate system-instruction block when one was
    /// supplied. An empty instruction is treated as absent.
    pub fn build_request(
        prompt: String,
        system_instruction: Option<String>,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![ContentBlock::from_text(prompt)],
            system_instruction: system_instruction
                .filter(|text| !text.is_empty())
                .map(ContentBlock::from_text),
        }
    }

    /// Endpoint URL with the credential as the `key` query parameter,
    /// the provider's documented auth placement.
    fn endpoint_url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }

    /// Send a generation request and return the upstream JSON body
    /// unmodified.
    ///
    /// # Errors
    ///
    /// `UpstreamRejection` with the upstream status and raw body text
    /// when the provider answers non-2xx; `Transport` when the call
    /// itself or the body decode fails.
    pub async fn generate(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<Value, ProxyError> {
        let response = self
            .client
            .post(self.endpoint_url(api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProxyError::UpstreamRejection {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::Transport(format!("Failed to parse response: {}", e)))
    }
}
