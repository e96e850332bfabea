use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{ChatCompletionRequest, ChatCompletionResponse, ModelError, ModelProvider};

#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    referer: String,
    title: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, base_url: &str, referer: String, title: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            referer,
            title,
        }
    }
}

#[async_trait]
impl ModelProvider for OpenRouterProvider {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "calling OpenRouter");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await
            .map_err(|error| ModelError::Transport(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| ModelError::Transport(error.to_string()))?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: error_body(&text, status.as_u16()),
            });
        }

        serde_json::from_str::<ChatCompletionResponse>(&text)
            .map_err(|error| ModelError::InvalidBody(error.to_string()))
    }
}

fn error_body(text: &str, status: u16) -> Value {
    if text.trim().is_empty() {
        return Value::String(format!("model provider returned status {status}"));
    }

    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}
