//! Common test utilities for integration tests
//!
//! Provides test server spawning, request builders, and SSE parsing.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use llm_emulator::{
    config::SimulatorConfig,
    server::{create_router, AppState},
};

/// Test server wrapper
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub base_url: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawn a test server with no latency and a fixed seed
    pub async fn spawn() -> Self {
        Self::spawn_with_config(SimulatorConfig::instant()).await
    }

    /// Spawn a test server with custom configuration
    pub async fn spawn_with_config(mut config: SimulatorConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        config.server.host = "127.0.0.1".to_string();
        config.server.port = addr.port();

        let state = AppState::new(config).unwrap();
        let app = create_router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        let base_url = format!("http://{}", addr);

        for _ in 0..50 {
            if client.get(format!("{}/health", base_url)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Self {
            addr,
            client,
            base_url,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// Send a POST request with JSON body
    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// POST, check for an event stream and parse the full body
    pub async fn post_stream(&self, path: &str, body: Value) -> Vec<SseFrame> {
        let response = self.post(path, body).await;
        assert_status(&response, 200);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/event-stream"), "got {}", content_type);
        parse_sse(&response.text().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// One parsed SSE frame
#[derive(Debug, Clone, PartialEq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

impl SseFrame {
    pub fn is_done(&self) -> bool {
        self.data == "[DONE]"
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.data).unwrap()
    }
}

/// Split an SSE body into frames. Every frame must end with a blank line.
pub fn parse_sse(body: &str) -> Vec<SseFrame> {
    assert!(body.is_empty() || body.ends_with("\n\n"), "unterminated frame in {:?}", body);

    body.split("\n\n")
        .filter(|block| !block.is_empty())
        .map(|block| {
            let mut event = None;
            let mut data = String::new();
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event: ") {
                    event = Some(name.to_string());
                } else if let Some(payload) = line.strip_prefix("data: ") {
                    data.push_str(payload);
                } else {
                    panic!("unexpected SSE line {:?}", line);
                }
            }
            SseFrame { event, data }
        })
        .collect()
}

/// Create a simple chat request
pub fn chat_request(model: &str, message: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": message
            }
        ]
    })
}

/// Create an Anthropic messages request
pub fn anthropic_request(model: &str, message: &str, max_tokens: u32) -> Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [
            {
                "role": "user",
                "content": message
            }
        ]
    })
}

/// Create a Gemini generate-content request
pub fn gemini_request(message: &str) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    {
                        "text": message
                    }
                ]
            }
        ]
    })
}

/// Set `_persona` and `stream` on a request body
pub fn with_persona(mut body: Value, persona: &str, stream: bool) -> Value {
    body["_persona"] = json!(persona);
    if stream {
        body["stream"] = json!(true);
    }
    body
}

/// Assert response status
pub fn assert_status(response: &reqwest::Response, expected: u16) {
    assert_eq!(
        response.status().as_u16(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert JSON field exists
pub fn assert_json_field(json: &Value, field: &str) {
    assert!(
        json.get(field).is_some(),
        "Expected field '{}' to exist in {:?}",
        field,
        json
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_server() {
        let server = TestServer::spawn().await;
        let response = server.get("/health").await;
        assert_eq!(response.status().as_u16(), 200);
    }

    #[test]
    fn test_parse_sse() {
        let frames = parse_sse("event: ping\ndata: {\"a\":1}\n\ndata: [DONE]\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event.as_deref(), Some("ping"));
        assert_eq!(frames[0].json()["a"], 1);
        assert!(frames[1].is_done());
    }
}
