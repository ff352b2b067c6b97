//! Gemini `generateContent` wire types

use serde::Serialize;

/// Request body for the `generateContent` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<ContentBlock>,
}

/// A block of content parts
#[derive(Debug, Clone, Serialize)]
pub struct ContentBlock {
    pub parts: Vec<ContentPart>,
}

/// A single text part
#[derive(Debug, Clone, Serialize)]
pub struct ContentPart {
    pub text: String,
}

impl ContentBlock {
    /// Wrap a text string in the `parts` nesting the API expects.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart { text: text.into() }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_system_instruction() {
        let request = GenerateContentRequest {
            contents: vec![ContentBlock::from_text("hello")],
            system_instruction: Some(ContentBlock::from_text("be brief")),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{"parts": [{"text": "hello"}]}],
                "systemInstruction": {"parts": [{"text": "be brief"}]}
            })
        );
    }

    #[test]
    fn omits_absent_system_instruction() {
        let request = GenerateContentRequest {
            contents: vec![ContentBlock::from_text("hello")],
            system_instruction: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }
}
