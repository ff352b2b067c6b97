//! Groq chat-completion wire types and the flattened reply shape

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single chat message in OpenAI wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Outbound `chat/completions` request
///
/// Model, sampling, token cap, and streaming are fixed server-side
/// policy; callers cannot influence them.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Flattened proxy reply
///
/// The first completion's text is lifted to a top-level `message`
/// field for the common case; the raw `choices` and `usage` from
/// upstream are republished for callers that want more. Fields absent
/// upstream are omitted from the serialized body, not emitted as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

impl ChatReply {
    /// Extract the reply shape from an upstream response body,
    /// tolerating any missing level of nesting.
    pub fn from_upstream(data: &Value) -> Self {
        Self {
            message: data
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_owned),
            choices: data.get("choices").cloned(),
            usage: data.get("usage").cloned(),
        }
    }
}
