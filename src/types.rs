use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    /// The prompt as typed, or `None` when it is missing or blank.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReply {
    pub aireply: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DummyReply {
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
