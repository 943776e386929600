//! Wire types for the chat-completions endpoint.

use agora_application::ResponseFormat;
use agora_domain::ChatMessage;
use serde::{Deserialize, Serialize};

/// `response_format` object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl From<ResponseFormat> for WireResponseFormat {
    fn from(format: ResponseFormat) -> Self {
        let kind = match format {
            ResponseFormat::Json => "json_object",
            ResponseFormat::Text => "text",
        };
        Self { kind }
    }
}

/// Request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Fallback list; the service answers with the first model that works
    #[serde(skip_serializing_if = "no_models")]
    pub models: &'a [String],
    pub messages: &'a [ChatMessage],
    pub response_format: WireResponseFormat,
}

fn no_models(models: &&[String]) -> bool {
    models.is_empty()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice
    pub fn into_content(self) -> Option<(String, String)> {
        let content = self.choices.into_iter().next()?.message.content?;
        Some((self.model, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let models = vec!["a/b".to_string()];
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let request = ChatRequest {
            models: &models,
            messages: &messages,
            response_format: ResponseFormat::Json.into(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "models": ["a/b"],
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "response_format": {"type": "json_object"}
            })
        );
    }

    #[test]
    fn test_empty_models_are_omitted() {
        let request = ChatRequest {
            models: &[],
            messages: &[],
            response_format: ResponseFormat::Text.into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("models").is_none());
        assert_eq!(value["response_format"]["type"], "text");
    }

    #[test]
    fn test_response_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "model": "qwen/qwen3.5-plus-02-15",
            "choices": [{"message": {"role": "assistant", "content": "{\"commands\": []}"}}]
        }))
        .unwrap();
        assert_eq!(
            response.into_content(),
            Some((
                "qwen/qwen3.5-plus-02-15".to_string(),
                "{\"commands\": []}".to_string()
            ))
        );

        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(empty.into_content().is_none());
    }
}
