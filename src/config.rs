use std::{env, net::SocketAddr};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_UI_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_TITLE: &str = "prompt-generator";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_bind: SocketAddr,
    pub model_provider: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub openrouter_referer: String,
    pub openrouter_title: String,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_owned());
        let http_bind = env::var("HTTP_BIND").unwrap_or_else(|_| format!("0.0.0.0:{port}"));
        let http_bind = http_bind.parse()?;

        Ok(Self {
            http_bind,
            model_provider: env::var("MODEL_PROVIDER").unwrap_or_else(|_| "auto".to_owned()),
            openrouter_api_key: env_non_empty("OPENROUTER_API_KEY"),
            openrouter_base_url: env_non_empty("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_owned()),
            openrouter_model: env_non_empty("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            openrouter_referer: env_non_empty("OPENROUTER_REFERER")
                .unwrap_or_else(|| DEFAULT_UI_ORIGIN.to_owned()),
            openrouter_title: env_non_empty("OPENROUTER_TITLE")
                .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            cors_origin: env_non_empty("CORS_ORIGIN")
                .unwrap_or_else(|| DEFAULT_UI_ORIGIN.to_owned()),
        })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|raw| raw.trim().to_owned())
        .filter(|value| !value.is_empty())
}
