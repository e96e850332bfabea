use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::{
    enhancer::{GenerationError, PromptEnhancer},
    types::{DummyReply, ErrorBody, GenerateReply, GenerateRequest},
};

const DUMMY_DATA: &str = "kehfdcjwvaeghcdqvaeghsvhdz";

#[derive(Clone)]
pub struct AppState {
    pub enhancer: Arc<PromptEnhancer>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Failed to generate content")]
    Generation(#[from] GenerationError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPrompt => StatusCode::BAD_REQUEST,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            Self::MissingPrompt => None,
            Self::Generation(error) => Some(error.details()),
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };

        (self.status_code(), Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/prompt/generate", post(generate))
        .route("/api/prompt/dummy", get(dummy))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy admitting the browser UI served from `origin`.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("invalid CORS origin {origin:?}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn index() -> &'static str {
    "Prompt enhancer backend is running"
}

async fn health() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateReply>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "unreadable generate request body");
            GenerateRequest::default()
        }
    };

    let prompt = request.prompt().ok_or(ApiError::MissingPrompt)?;
    let aireply = state.enhancer.enhance(prompt).await?;

    Ok(Json(GenerateReply { aireply }))
}

async fn dummy() -> Json<DummyReply> {
    Json(DummyReply {
        data: DUMMY_DATA.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        enhancer::PromptEnhancer,
        model::{ChatCompletionRequest, ChatCompletionResponse, ModelError, ModelProvider},
    };

    use super::{AppState, cors_layer, router};

    #[derive(Default)]
    struct CountingModelProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ModelProvider for CountingModelProvider {
        async fn complete(
            &self,
            _request: ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ModelError::Transport("connection reset".into()));
            }
            Ok(ChatCompletionResponse::with_text(
                "**Enhanced Prompt:** Explain ownership in Rust with examples.",
            ))
        }
    }

    fn app(provider: Arc<CountingModelProvider>) -> Router {
        router(AppState {
            enhancer: Arc::new(PromptEnhancer::new(provider, "gpt-4o-mini")),
        })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/api/prompt/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request should build")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn generate_returns_cleaned_reply() {
        let provider = Arc::new(CountingModelProvider::default());

        let (status, body) = send(
            app(provider.clone()),
            post_json(r#"{"prompt":"explain ownership"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "aireply": "Explain ownership in Rust with examples." })
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_missing_or_blank_prompt_without_calling_model() {
        let provider = Arc::new(CountingModelProvider::default());

        let bodies = [
            r#"{}"#,
            r#"{"prompt":""}"#,
            r#"{"prompt":"   "}"#,
            r#"{"prompt":null}"#,
            "not json",
        ];
        for body in bodies {
            let (status, payload) = send(app(provider.clone()), post_json(body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(payload, json!({ "error": "Prompt is required" }));
        }

        let no_content_type = Request::post("/api/prompt/generate")
            .body(Body::empty())
            .expect("request should build");
        let (status, _) = send(app(provider.clone()), no_content_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generation_failure_maps_to_500() {
        let provider = Arc::new(CountingModelProvider {
            fail: true,
            ..Default::default()
        });

        let (status, body) = send(app(provider.clone()), post_json(r#"{"prompt":"hi"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Failed to generate content",
                "details": "request to model provider failed: connection reset"
            })
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dummy_returns_constant() {
        let request = Request::get("/api/prompt/dummy")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"prompt":"ignored"}"#))
            .expect("request should build");

        let (status, body) = send(app(Arc::default()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": "kehfdcjwvaeghcdqvaeghsvhdz" }));
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let app = app(Arc::default()).layer(cors_layer("http://localhost:5173").expect("valid"));
        let request = Request::get("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .expect("request should build");

        let response = app.oneshot(request).await.expect("router is infallible");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("http://localhost:5173")
        );
    }

    #[test]
    fn cors_rejects_invalid_origin() {
        assert!(cors_layer("bad\norigin").is_err());
    }
}
