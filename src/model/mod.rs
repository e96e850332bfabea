mod mock;
mod openrouter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use mock::MockModelProvider;
pub use openrouter::OpenRouterProvider;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Body of an OpenAI-compatible `/chat/completions` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub fn user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == ChatRole::User)
            .map(|message| message.content.as_str())
    }
}

/// Provider answer. Everything except the first choice's content is ignored,
/// and every level is optional so that a missing path can be reported
/// instead of failing the decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<Value>,
}

impl ChatCompletionResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: Some(ChatChoiceMessage {
                    content: Some(Value::String(text.into())),
                }),
            }],
        }
    }

    /// Text of `choices[0].message.content`, if the provider sent any.
    pub fn first_content(&self) -> Option<String> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_ref()
            .and_then(extract_message_content)
    }
}

fn extract_message_content(content: &Value) -> Option<String> {
    if let Some(text) = content.as_str() {
        return Some(text.to_owned());
    }

    let array = content.as_array()?;
    Some(
        array
            .iter()
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
    )
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model provider returned status {status}")]
    Status { status: u16, body: Value },

    #[error("request to model provider failed: {0}")]
    Transport(String),

    #[error("model provider sent an undecodable body: {0}")]
    InvalidBody(String),
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError>;
}
