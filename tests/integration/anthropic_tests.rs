//! Anthropic API endpoint integration tests

use super::common::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_messages_basic() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/messages", anthropic_request("claude-3-5-sonnet-20241022", "Hello", 1024))
        .await;
    assert_status(&response, 200);

    let body: Value = response.json().await.unwrap();
    for field in ["id", "type", "role", "model", "content", "stop_reason", "usage"] {
        assert_json_field(&body, field);
    }

    assert_eq!(body["type"], "message");
    assert_eq!(body["role"], "assistant");
    assert!(body["id"].as_str().unwrap().starts_with("msg_"));
    assert_eq!(body["content"][0]["type"], "text");
    assert!(!body["content"][0]["text"].as_str().unwrap().is_empty());
    assert_eq!(body["stop_reason"], "end_turn");
    assert!(body["usage"]["input_tokens"].as_u64().unwrap() > 0);
    assert!(body["usage"]["output_tokens"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_system_prompt_accepted() {
    let server = TestServer::spawn().await;

    let mut request = anthropic_request("claude-3-haiku-20240307", "Hi", 64);
    request["system"] = json!([{"type": "text", "text": "You are terse."}]);

    let response = server.post("/v1/messages", request).await;
    assert_status(&response, 200);
}

#[tokio::test]
async fn test_tool_use_document() {
    let server = TestServer::spawn().await;

    let request = with_persona(anthropic_request("claude-3-opus-20240229", "Weather?", 256), "tool_calls", false);
    let body: Value = server.post("/v1/messages", request).await.json().await.unwrap();

    assert_eq!(body["stop_reason"], "tool_use");
    let blocks = body["content"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["type"], "text");
    assert_eq!(blocks[1]["type"], "tool_use");
    assert!(blocks[1]["id"].as_str().unwrap().starts_with("toolu_"));
    assert!(blocks[1]["input"].is_object());
}

#[tokio::test]
async fn test_streaming_tool_persona() {
    let server = TestServer::spawn().await;

    let request = with_persona(anthropic_request("claude-3-5-sonnet-20241022", "Weather?", 256), "tool_calls", true);
    let frames = server.post_stream("/v1/messages", request).await;

    let names: Vec<&str> = frames.iter().map(|f| f.event.as_deref().unwrap()).collect();
    assert_eq!(names.first(), Some(&"message_start"));
    assert_eq!(names.last(), Some(&"message_stop"));
    assert!(frames.iter().all(|f| !f.is_done()));

    let payloads: Vec<Value> = frames.iter().map(SseFrame::json).collect();
    for (name, payload) in names.iter().zip(&payloads) {
        assert_eq!(payload["type"], *name);
    }

    let tool_blocks = payloads
        .iter()
        .filter(|p| p["type"] == "content_block_start" && p["content_block"]["type"] == "tool_use")
        .count();
    assert_eq!(tool_blocks, 1);

    let message_delta = payloads.iter().rev().find(|p| p["type"] == "message_delta").unwrap();
    assert_eq!(message_delta["delta"]["stop_reason"], "tool_use");

    let partial: String = payloads
        .iter()
        .filter(|p| p["delta"]["type"] == "input_json_delta")
        .map(|p| p["delta"]["partial_json"].as_str().unwrap())
        .collect();
    let input: Value = serde_json::from_str(&partial).unwrap();
    assert!(input.is_object());
}

#[tokio::test]
async fn test_streaming_block_nesting() {
    let server = TestServer::spawn().await;

    let request = with_persona(anthropic_request("claude-3-5-sonnet-20241022", "Hi", 256), "markdown", true);
    let frames = server.post_stream("/v1/messages", request).await;
    let payloads: Vec<Value> = frames.iter().map(SseFrame::json).collect();

    let mut open: Option<u64> = None;
    for payload in &payloads {
        match payload["type"].as_str().unwrap() {
            "content_block_start" => {
                assert!(open.is_none(), "block opened while another is open");
                open = payload["index"].as_u64();
            }
            "content_block_delta" => assert_eq!(payload["index"].as_u64(), open),
            "content_block_stop" => {
                assert_eq!(payload["index"].as_u64(), open);
                open = None;
            }
            "message_delta" | "message_stop" => assert!(open.is_none()),
            _ => {}
        }
    }

    let text: String = payloads
        .iter()
        .filter(|p| p["delta"]["type"] == "text_delta")
        .map(|p| p["delta"]["text"].as_str().unwrap())
        .collect();
    assert!(text.starts_with('#'));
}

#[tokio::test]
async fn test_zero_max_tokens_rejected() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/messages", anthropic_request("claude-3-5-sonnet-20241022", "Hi", 0))
        .await;
    assert_status(&response, 400);
}

#[tokio::test]
async fn test_missing_model_rejected() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/messages", json!({"max_tokens": 10, "messages": [{"role": "user", "content": "Hi"}]}))
        .await;
    assert_status(&response, 400);
}
