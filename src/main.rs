use std::sync::Arc;

use prompt_enhancer::{
    config::AppConfig,
    enhancer::PromptEnhancer,
    http::{self, AppState},
    model::{MockModelProvider, ModelProvider, OpenRouterProvider},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let model = build_model_provider(&config);
    let enhancer = Arc::new(PromptEnhancer::new(model, config.openrouter_model.clone()));

    let app = http::router(AppState { enhancer }).layer(http::cors_layer(&config.cors_origin)?);
    let listener = TcpListener::bind(config.http_bind).await?;
    info!("Prompt enhancer listening on http://{}", config.http_bind);

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}

fn build_model_provider(config: &AppConfig) -> Arc<dyn ModelProvider> {
    let provider = config.model_provider.to_lowercase();
    match provider.as_str() {
        "mock" => {
            warn!("MODEL_PROVIDER=mock; using mock model provider");
            Arc::new(MockModelProvider)
        }
        "openrouter" | "auto" => openrouter_or_mock(config),
        other => {
            warn!(provider = other, "unknown MODEL_PROVIDER; falling back to auto");
            openrouter_or_mock(config)
        }
    }
}

fn openrouter_or_mock(config: &AppConfig) -> Arc<dyn ModelProvider> {
    if let Some(api_key) = config.openrouter_api_key.clone() {
        info!(model = %config.openrouter_model, "using OpenRouter model provider");
        Arc::new(OpenRouterProvider::new(
            api_key,
            &config.openrouter_base_url,
            config.openrouter_referer.clone(),
            config.openrouter_title.clone(),
        ))
    } else {
        warn!("No OPENROUTER_API_KEY configured; using mock model provider");
        Arc::new(MockModelProvider)
    }
}
