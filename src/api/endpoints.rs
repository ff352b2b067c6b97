//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the chat proxy: the
//! two provider endpoints the front-end chat widget calls, plus
//! service-info and health checks.

use crate::api::middleware;
use crate::core::config::Config;
use crate::core::error::ProxyError;
use crate::core::providers::{GeminiClient, GroqClient};
use crate::models::groq::ChatReply;
use crate::models::request::{ChatRequest, GenerateRequest};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gemini: Arc<GeminiClient>,
    pub groq: Arc<GroqClient>,
}

impl AppState {
    /// Build the provider clients from the configuration.
    pub fn from_config(config: Arc<Config>) -> Self {
        let gemini = Arc::new(GeminiClient::new(
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            config.request_timeout,
        ));
        let groq = Arc::new(GroqClient::new(
            config.groq_base_url.clone(),
            config.groq_model.clone(),
            config.groq_temperature,
            config.groq_max_tokens,
            config.request_timeout,
        ));

        Self {
            config,
            gemini,
            groq,
        }
    }
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/api/gemini",
            post(generate_message).fallback(method_not_allowed),
        )
        .route("/api/groq", post(chat_message).fallback(method_not_allowed))
        .route("/health", get(health_check))
        .layer(axum::middleware::from_fn(middleware::cors))
        .with_state(state)
}

/// Shared 405 for the proxy routes: advertises the single supported
/// method and still answers with the standard error envelope.
async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

/// POST /api/gemini - single-turn generation proxy
///
/// Credential lookup precedes body validation, so an unprovisioned
/// deployment answers 500 even for invalid bodies. On success the
/// upstream JSON is returned verbatim.
async fn generate_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let Some(api_key) = state
        .config
        .gemini_api_key
        .as_deref()
        .filter(|key| !key.is_empty())
    else {
        error!("Rejecting /api/gemini request: Gemini API key is not configured");
        return Err(ProxyError::MissingCredential);
    };

    let request = GenerateRequest::from_body(&body);
    let prompt = match request.prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(ProxyError::InvalidRequest("Missing prompt".to_string())),
    };

    info!(
        "Incoming generation request: prompt_chars={}, system_instruction={}",
        prompt.len(),
        request.system_instruction.is_some()
    );

    let upstream_request = GeminiClient::build_request(prompt, request.system_instruction);
    let data = state.gemini.generate(api_key, &upstream_request).await?;

    Ok(Json(data))
}

/// POST /api/groq - multi-turn chat-completion proxy
///
/// Same gating order as the generation endpoint. On success the reply
/// is flattened to `{message?, choices?, usage?}`.
async fn chat_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ProxyError> {
    let Some(api_key) = state
        .config
        .groq_api_key
        .as_deref()
        .filter(|key| !key.is_empty())
    else {
        error!("Rejecting /api/groq request: Groq API key is not configured");
        return Err(ProxyError::MissingCredential);
    };

    let request = ChatRequest::from_body(&body);
    let Some(history) = request.messages.as_ref().and_then(Value::as_array) else {
        return Err(ProxyError::InvalidRequest(
            "Messages array is required".to_string(),
        ));
    };

    info!(
        "Incoming chat request: history_len={}, system_instruction={}",
        history.len(),
        request.system_instruction.is_some()
    );

    let upstream_request =
        state
            .groq
            .build_request(request.system_instruction.as_deref(), history);
    let reply = state.groq.chat(api_key, &upstream_request).await?;

    Ok(Json(reply))
}

/// GET / - Service info endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Lore Chat Proxy v0.1.0",
        "status": "running",
        "config": {
            "gemini_model": state.config.gemini_model,
            "groq_model": state.config.groq_model,
            "gemini_configured": state.config.gemini_configured(),
            "groq_configured": state.config.groq_configured(),
        },
        "endpoints": {
            "gemini": "/api/gemini",
            "groq": "/api/groq",
            "health": "/health",
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "gemini_configured": state.config.gemini_configured(),
        "groq_configured": state.config.groq_configured(),
    }))
}
