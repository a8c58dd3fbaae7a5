//! HTTP request handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tokio::time::sleep;

use super::routes::SUPPORTED_ROUTES;
use super::state::AppState;
use super::streaming::sse_response;
use crate::error::{SimulationError, SimulatorResult};
use crate::providers::emitter_for;
use crate::telemetry::{metrics, render_metrics};
use crate::types::*;

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> SimulatorResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| SimulationError::invalid_body(format!("Invalid request body: {}", e)))
}

/// Shared request path for all three providers
async fn simulate(state: &AppState, request: SimulationRequest) -> SimulatorResult<Response> {
    metrics::record_request(request.provider, request.stream);

    let completion = match state.engine.prepare(&request) {
        Ok(completion) => completion,
        Err(fault) => return Ok(fault.into_response()),
    };
    metrics::record_tokens(request.provider, completion.usage.input, completion.usage.output);

    let emitter = emitter_for(request.provider);
    if request.stream {
        let plan = emitter.plan_stream(&completion)?;
        return Ok(sse_response(&completion, plan, state.engine.shared_random()));
    }

    let delay = completion.latency.first_unit_delay(state.engine.random());
    if !delay.is_zero() {
        sleep(delay).await;
    }
    let document = emitter.render_document(&completion)?;
    Ok(Json(document).into_response())
}

// ============== OpenAI Handlers ==============

/// POST /v1/chat/completions
pub async fn openai_chat_completions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, SimulationError> {
    let request: ChatCompletionRequest = parse_body(&body)?;
    request.validate()?;
    simulate(&state, request.to_simulation()).await
}

// ============== Anthropic Handlers ==============

/// POST /v1/messages
pub async fn anthropic_messages(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, SimulationError> {
    let request: AnthropicMessagesRequest = parse_body(&body)?;
    request.validate()?;
    simulate(&state, request.to_simulation()).await
}

// ============== Gemini Handlers ==============

/// Split `gemini-pro:streamGenerateContent` into the model and whether the
/// action streams
pub fn parse_model_action(model_action: &str) -> Option<(&str, bool)> {
    let (model, action) = model_action.rsplit_once(':')?;
    if model.is_empty() {
        return None;
    }
    match action {
        "generateContent" => Some((model, false)),
        "streamGenerateContent" => Some((model, true)),
        _ => None,
    }
}

/// POST /v1beta/models/{model}:generateContent and :streamGenerateContent
pub async fn gemini_generate_content(
    State(state): State<AppState>,
    Path(model_action): Path<String>,
    uri: Uri,
    body: Bytes,
) -> Result<Response, SimulationError> {
    let (model, stream) = parse_model_action(&model_action)
        .ok_or_else(|| SimulationError::RouteNotFound(uri.path().to_string()))?;
    let request: GeminiRequest = parse_body(&body)?;
    request.validate()?;
    simulate(&state, request.to_simulation(model, stream)).await
}

// ============== Utility Handlers ==============

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(crate::VERSION, state.uptime()))
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        render_metrics(),
    )
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub routes: Vec<&'static str>,
    pub personas: Vec<String>,
    pub chaos_enabled: bool,
    pub latency_enabled: bool,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        name: "LLM Emulator".to_string(),
        version: crate::VERSION.to_string(),
        routes: SUPPORTED_ROUTES.to_vec(),
        personas: state.engine.catalog().names().into_iter().map(String::from).collect(),
        chaos_enabled: state.engine.faults().is_active(),
        latency_enabled: state.engine.latency().is_enabled(),
    })
}

/// Unknown routes: 404 with the list of supported routes
pub async fn not_found(uri: Uri) -> Response {
    let error = SimulationError::RouteNotFound(uri.path().to_string());
    tracing::debug!(path = %uri.path(), "Unknown route");
    let body = json!({
        "error": {
            "message": error.to_string(),
            "type": error.error_type(),
        },
        "supported_routes": SUPPORTED_ROUTES,
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
