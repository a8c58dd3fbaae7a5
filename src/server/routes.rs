//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::state::AppState;

/// Routes listed by `GET /` and by the not-found response
pub const SUPPORTED_ROUTES: [&str; 8] = [
    "POST /v1/chat/completions",
    "POST /v1/messages",
    "POST /v1beta/models/{model}:generateContent",
    "POST /v1beta/models/{model}:streamGenerateContent",
    "POST /v1/models/{model}:generateContent",
    "POST /v1/models/{model}:streamGenerateContent",
    "GET /health",
    "GET /metrics",
];

/// OpenAI compatible API routes
pub fn openai_routes() -> Router<AppState> {
    Router::new().route("/v1/chat/completions", post(handlers::openai_chat_completions))
}

/// Anthropic compatible API routes
pub fn anthropic_routes() -> Router<AppState> {
    Router::new().route("/v1/messages", post(handlers::anthropic_messages))
}

/// Gemini compatible API routes. The model and the action share one path
/// segment (`gemini-pro:generateContent`) and are split in the handler.
pub fn google_routes() -> Router<AppState> {
    Router::new()
        .route("/v1beta/models/:model_action", post(handlers::gemini_generate_content))
        .route("/v1/models/:model_action", post(handlers::gemini_generate_content))
}

/// Health, metrics and index routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/", get(handlers::root))
}
