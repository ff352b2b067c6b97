//! Groq multi-turn chat-completion client
//!
//! Owns the upstream leg of the `/api/groq` endpoint: history
//! sanitization, outbound message assembly, the fixed generation
//! policy, the bearer-authenticated call, and response flattening.

use crate::core::constants::role;
use crate::core::error::ProxyError;
use crate::models::groq::{ChatCompletionRequest, ChatMessage, ChatReply};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Salvage a single history element.
///
/// Permissive-drop policy: an element survives only when it carries
/// both a string `role` and a string `content`. Anything else — a
/// non-object, a missing field, a non-string value — is dropped
/// silently so garbage in the history never fails the whole request.
pub fn sanitize_message(raw: &Value) -> Option<ChatMessage> {
    let role = raw.get("role")?.as_str()?;
    let content = raw.get("content")?.as_str()?;

    Some(ChatMessage {
        role: role.to_string(),
        content: content.to_string(),
    })
}

/// Client for the Groq OpenAI-compatible `chat/completions` API
pub struct GroqClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl GroqClient {
    /// Create a new Groq client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL (overridable so tests can stub it)
    /// * `model` - chat model identifier
    /// * `temperature` - fixed sampling temperature
    /// * `max_tokens` - fixed completion token cap
    /// * `timeout` - request timeout in seconds
    pub fn new(
        base_url: String,
        model: String,
        temperature: f64,
        max_tokens: u32,
        timeout: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Assemble the outbound message list and fixed generation policy.
    ///
    /// A non-empty system instruction is prepended as a `system` turn;
    /// every history element then passes through [`sanitize_message`].
    pub fn build_request(
        &self,
        system_instruction: Option<&str>,
        history: &[Value],
    ) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);

        if let Some(text) = system_instruction.filter(|text| !text.is_empty()) {
            messages.push(ChatMessage {
                role: role::SYSTEM.to_string(),
                content: text.to_string(),
            });
        }

        messages.extend(history.iter().filter_map(sanitize_message));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }

    /// Send a chat completion and flatten the response.
    ///
    /// # Errors
    ///
    /// `UpstreamRejection` with the upstream status and raw body text
    /// when the provider answers non-2xx; `Transport` when the call
    /// itself or the body decode fails.
    pub async fn chat(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatReply, ProxyError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
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

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProxyError::Transport(format!("Failed to parse response: {}", e)))?;

        Ok(ChatReply::from_upstream(&data))
    }
}
