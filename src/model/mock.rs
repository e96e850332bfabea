use async_trait::async_trait;

use super::{ChatCompletionRequest, ChatCompletionResponse, ModelError, ModelProvider};

/// Offline provider used when no OpenRouter key is configured.
#[derive(Debug, Default)]
pub struct MockModelProvider;

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError> {
        let original = request
            .user_message()
            .and_then(|message| message.split_once("\n\n"))
            .map(|(_, prompt)| prompt.trim())
            .unwrap_or_default();

        Ok(ChatCompletionResponse::with_text(format!(
            "Enhanced prompt: You are an expert assistant. {original}\n\n\
             Explain your reasoning step by step, state any assumptions, \
             and finish with a concise summary."
        )))
    }
}
