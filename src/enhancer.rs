use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    cleanup::clean_model_output,
    model::{ChatCompletionRequest, ChatMessage, ChatRole, ModelError, ModelProvider},
};

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 600;

const SYSTEM_PROMPT: &str = "You are an elite AI prompt engineer specializing in crafting high-quality prompts that maximize AI model performance and accuracy.

YOUR MISSION: Transform user inputs into detailed, structured prompts that produce the best possible AI responses.

STRICT OUTPUT RULES:
- Return ONLY the enhanced prompt text itself
- NEVER add explanations, introductions, or meta-commentary
- NEVER use phrases like \"Here's the prompt:\" or \"Enhanced version:\"
- Start immediately with the prompt content
- Output should be ready to copy-paste directly into any AI model

PROMPT ENHANCEMENT STRATEGY:
1. Add specific context and background information
2. Define clear objectives and expected outcomes
3. Include relevant constraints, format requirements, or style guidelines
4. Specify the desired tone, complexity level, or audience
5. Break complex requests into clear sub-tasks when needed
6. Add examples or reference points if they improve clarity
7. Include success criteria or quality indicators

QUALITY STANDARDS:
- Make prompts detailed enough to eliminate ambiguity
- Ensure prompts are self-contained and don't require follow-up questions
- Structure information logically for optimal AI comprehension
- Preserve the user's original intent while maximizing clarity
- Create prompts that lead to accurate, comprehensive, and useful responses";

const USER_INSTRUCTION: &str = "Transform this into a detailed, high-quality prompt that will get the best and most accurate response from AI models. Return ONLY the enhanced prompt:";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model response has no message content")]
    MalformedResponse,
}

impl GenerationError {
    /// Diagnostic payload for API clients: the provider's own error body when
    /// it sent one, otherwise the error message.
    pub fn details(&self) -> Value {
        match self {
            Self::Model(ModelError::Status { body, .. }) => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

pub struct PromptEnhancer {
    model: Arc<dyn ModelProvider>,
    model_id: String,
}

impl PromptEnhancer {
    pub fn new(model: Arc<dyn ModelProvider>, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
        }
    }

    /// Rewrites `prompt` into a more detailed prompt. The model is called
    /// exactly once.
    pub async fn enhance(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = build_request(&self.model_id, prompt);

        let result = self
            .model
            .complete(request)
            .await
            .map_err(GenerationError::from)
            .and_then(|response| {
                response
                    .first_content()
                    .ok_or(GenerationError::MalformedResponse)
            });

        match result {
            Ok(raw) => {
                let enhanced = clean_model_output(&raw);
                info!(
                    prompt_chars = prompt.chars().count(),
                    reply_chars = enhanced.chars().count(),
                    "prompt enhanced"
                );
                Ok(enhanced)
            }
            Err(failure) => {
                error!(error = %failure, details = %failure.details(), "prompt enhancement failed");
                Err(failure)
            }
        }
    }
}

pub fn build_request(model_id: &str, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model_id.to_owned(),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        messages: vec![
            ChatMessage {
                role: ChatRole::System,
                content: SYSTEM_PROMPT.to_owned(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: format!("{USER_INSTRUCTION}\n\n{prompt}"),
            },
        ],
    }
}
