//! Inbound request types for the proxy endpoints
//!
//! These are deliberately lenient: the front-end contract treats an
//! absent or unparsable body as `{}`, so every field is optional and
//! the handlers enforce their own field requirements with their own
//! error wording instead of surfacing deserializer rejections.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /api/gemini`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub system_instruction: Option<String>,
}

impl GenerateRequest {
    /// Parse a raw request body, tolerating absence and malformed JSON.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Body of `POST /api/groq`
///
/// `messages` stays an untyped [`Value`]: whether it is an array is a
/// contract decision with its own error wording, and malformed
/// elements are salvaged one by one rather than failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub messages: Option<Value>,
    pub system_instruction: Option<String>,
}

impl ChatRequest {
    /// Parse a raw request body, tolerating absence and malformed JSON.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}
