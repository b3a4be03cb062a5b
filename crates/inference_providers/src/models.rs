use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Output format the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionParams {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<i64>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ChatCompletionParams {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_completion_tokens: None,
            response_format: ResponseFormat::Text,
        }
    }

    /// Ask the model for a JSON document instead of free text
    pub fn json(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// All message text joined with spaces
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub total_tokens: i32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: i32, completion_tokens: i32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub model: String,
    /// Concatenated text of the first choice
    pub content: Option<String>,
    pub finish_reason: Option<FinishReason>,
    /// Absent when the provider did not report usage
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompletionError {
    #[error("Failed to perform completion: {0}")]
    CompletionError(String),
    #[error("HTTP error {status_code}: {message}")]
    HttpError { status_code: u16, message: String },
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Provider returned no content")]
    NoContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(14, 3);
        assert_eq!(usage.total_tokens, 17);
    }

    #[test]
    fn test_prompt_text_joins_messages() {
        let params = ChatCompletionParams::new(
            "gemini-2.5-flash",
            vec![ChatMessage::system("be brief"), ChatMessage::user("hola")],
        )
        .json();
        assert_eq!(params.prompt_text(), "be brief hola");
        assert_eq!(params.response_format, ResponseFormat::Json);
    }

    #[test]
    fn test_http_error_display() {
        let err = CompletionError::HttpError {
            status_code: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 429: quota");
    }
}
