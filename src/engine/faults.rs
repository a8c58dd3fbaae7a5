//! Provider-exact fault responses
//!
//! Each (kind, provider) pair maps to a hand-authored payload in the real
//! provider's error schema. Undefined pairs fall back to that provider's
//! server-error payload; unknown providers fall back to the OpenAI shape.
//! Rendering never fails.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::types::{FaultKind, Provider};

/// `retry-after` used when no configured value is supplied
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 20;

/// A rendered fault: status, extra headers and JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct FaultResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl FaultResponse {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Look up a header by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace the `retry-after` value on rate-limit responses
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        if self.status == StatusCode::TOO_MANY_REQUESTS {
            for (name, value) in self.headers.iter_mut() {
                if *name == "retry-after" {
                    *value = secs.to_string();
                }
            }
        }
        self
    }
}

impl IntoResponse for FaultResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        for (name, value) in self.headers {
            if let Ok(value) = HeaderValue::from_str(&value) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(name), value);
            }
        }
        response
    }
}

fn openai_payload(kind: FaultKind) -> Option<(StatusCode, Value)> {
    let payload = match kind {
        FaultKind::RateLimit => (
            StatusCode::TOO_MANY_REQUESTS,
            json!({
                "error": {
                    "message": "Rate limit reached for requests. Please try again in a few seconds.",
                    "type": "requests",
                    "param": null,
                    "code": "rate_limit_exceeded"
                }
            }),
        ),
        FaultKind::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, openai_generic()),
        FaultKind::ContextLength => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": {
                    "message": "This model's maximum context length is 128000 tokens. However, your messages resulted in 131072 tokens. Please reduce the length of the messages.",
                    "type": "invalid_request_error",
                    "param": "messages",
                    "code": "context_length_exceeded"
                }
            }),
        ),
        FaultKind::Timeout => (
            StatusCode::REQUEST_TIMEOUT,
            json!({
                "error": {
                    "message": "Request timed out.",
                    "type": "timeout",
                    "param": null,
                    "code": "timeout"
                }
            }),
        ),
    };
    Some(payload)
}

fn openai_generic() -> Value {
    json!({
        "error": {
            "message": "The server had an error while processing your request. Sorry about that!",
            "type": "server_error",
            "param": null,
            "code": null
        }
    })
}

fn anthropic_payload(kind: FaultKind) -> Option<(StatusCode, Value)> {
    let (status, error_type, message) = match kind {
        FaultKind::RateLimit => (
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limit_error",
            "Number of requests has exceeded your per-minute rate limit. Please try again later.",
        ),
        FaultKind::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "api_error",
            "Internal server error",
        ),
        FaultKind::ContextLength => (
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            "prompt is too long: 215000 tokens > 200000 maximum",
        ),
        FaultKind::Timeout => return None,
    };
    Some((
        status,
        json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": message
            }
        }),
    ))
}

fn gemini_payload(kind: FaultKind) -> Option<(StatusCode, Value)> {
    let (status, message, status_name) = match kind {
        FaultKind::RateLimit => (
            StatusCode::TOO_MANY_REQUESTS,
            "Resource has been exhausted (e.g. check quota).",
            "RESOURCE_EXHAUSTED",
        ),
        FaultKind::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error has occurred. Please retry or report in https://developers.generativeai.google/guide/troubleshooting",
            "INTERNAL",
        ),
        FaultKind::ContextLength => (
            StatusCode::BAD_REQUEST,
            "The input token count (1048577) exceeds the maximum number of tokens allowed (1048576).",
            "INVALID_ARGUMENT",
        ),
        FaultKind::Timeout => (
            StatusCode::GATEWAY_TIMEOUT,
            "The request timed out. Please try again.",
            "DEADLINE_EXCEEDED",
        ),
    };
    Some((
        status,
        json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
                "status": status_name
            }
        }),
    ))
}

fn payload(kind: FaultKind, provider: Provider) -> Option<(StatusCode, Value)> {
    match provider {
        Provider::OpenAI => openai_payload(kind),
        Provider::Anthropic => anthropic_payload(kind),
        Provider::Gemini => gemini_payload(kind),
    }
}

fn rate_limit_headers(provider: Option<Provider>, retry_after: u64) -> Vec<(&'static str, String)> {
    let mut headers = vec![("retry-after", retry_after.to_string())];
    match provider {
        Some(Provider::Anthropic) => {
            headers.push(("anthropic-ratelimit-requests-remaining", "0".to_string()));
        }
        Some(Provider::Gemini) => {}
        Some(Provider::OpenAI) | None => {
            headers.push(("x-ratelimit-remaining-requests", "0".to_string()));
            headers.push(("x-ratelimit-reset-requests", format!("{}s", retry_after)));
        }
    }
    headers
}

fn finish(provider: Option<Provider>, status: StatusCode, body: Value) -> FaultResponse {
    let mut response = FaultResponse::new(status, body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        response.headers = rate_limit_headers(provider, DEFAULT_RETRY_AFTER_SECS);
    }
    response
}

/// Render `kind` in `provider`'s error schema
pub fn render_fault(kind: FaultKind, provider: Provider) -> FaultResponse {
    let (status, body) = payload(kind, provider)
        .or_else(|| payload(FaultKind::ServerError, provider))
        .unwrap_or_else(|| (StatusCode::INTERNAL_SERVER_ERROR, openai_generic()));
    finish(Some(provider), status, body)
}

/// Render `kind` for a provider given by name. Unknown names get the
/// OpenAI-shaped error.
pub fn render_fault_for_tag(kind: FaultKind, provider: &str) -> FaultResponse {
    match provider.parse::<Provider>() {
        Ok(provider) => render_fault(kind, provider),
        Err(_) => {
            let (status, body) = openai_payload(kind)
                .unwrap_or_else(|| (StatusCode::INTERNAL_SERVER_ERROR, openai_generic()));
            finish(None, status, body)
        }
    }
}
