//! OpenAI API endpoint integration tests

use super::common::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_chat_completions_basic() {
    let server = TestServer::spawn().await;

    let mut request = chat_request("gpt-4", "Hello");
    request["stream"] = json!(false);
    let response = server.post("/v1/chat/completions", request).await;
    assert_status(&response, 200);

    let body: Value = response.json().await.unwrap();
    for field in ["id", "object", "created", "model", "choices", "usage"] {
        assert_json_field(&body, field);
    }

    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["model"], "gpt-4");
    assert!(body["id"].as_str().unwrap().starts_with("chatcmpl-"));
    assert!(!body["choices"][0]["message"]["content"].as_str().unwrap().is_empty());
    assert_eq!(body["choices"][0]["finish_reason"], "stop");

    let usage = &body["usage"];
    assert_eq!(
        usage["total_tokens"].as_u64().unwrap(),
        usage["prompt_tokens"].as_u64().unwrap() + usage["completion_tokens"].as_u64().unwrap()
    );
}

#[tokio::test]
async fn test_persona_override() {
    let server = TestServer::spawn().await;

    let request = with_persona(chat_request("gpt-4o", "Anything?"), "concise", false);
    let body: Value = server.post("/v1/chat/completions", request).await.json().await.unwrap();

    let content = body["choices"][0]["message"]["content"].as_str().unwrap();
    assert!(["Yes.", "No.", "Done.", "42", "OK"].contains(&content), "got {:?}", content);
}

#[tokio::test]
async fn test_unknown_persona_falls_back() {
    let server = TestServer::spawn().await;

    let request = with_persona(chat_request("gpt-4", "Hi"), "no-such-persona", false);
    let response = server.post("/v1/chat/completions", request).await;
    assert_status(&response, 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
}

#[tokio::test]
async fn test_tool_call_document() {
    let server = TestServer::spawn().await;

    let request = with_persona(chat_request("gpt-4", "Weather?"), "tool_calls", false);
    let body: Value = server.post("/v1/chat/completions", request).await.json().await.unwrap();

    let choice = &body["choices"][0];
    assert_eq!(choice["finish_reason"], "tool_calls");
    assert!(choice["message"]["content"].is_null());

    let call = &choice["message"]["tool_calls"][0];
    assert_eq!(call["type"], "function");
    assert!(call["id"].as_str().unwrap().starts_with("call_"));
    let args: Value = serde_json::from_str(call["function"]["arguments"].as_str().unwrap()).unwrap();
    assert!(args.is_object());
}

#[tokio::test]
async fn test_declared_tools_without_tool_persona() {
    let server = TestServer::spawn().await;

    let mut request = with_persona(chat_request("gpt-4", "Hi"), "concise", false);
    request["tools"] = json!([{"type": "function", "function": {"name": "noop"}}]);
    let body: Value = server.post("/v1/chat/completions", request).await.json().await.unwrap();

    assert_eq!(body["choices"][0]["finish_reason"], "stop");
}

#[tokio::test]
async fn test_streaming_text() {
    let server = TestServer::spawn().await;

    let request = with_persona(chat_request("gpt-4", "Hi"), "verbose", true);
    let frames = server.post_stream("/v1/chat/completions", request).await;

    assert!(frames.iter().all(|f| f.event.is_none()));
    assert!(frames.last().unwrap().is_done());

    let chunks: Vec<Value> = frames[..frames.len() - 1].iter().map(SseFrame::json).collect();
    assert!(chunks.iter().all(|c| c["object"] == "chat.completion.chunk"));
    assert_eq!(chunks[0]["choices"][0]["delta"]["role"], "assistant");

    let id = chunks[0]["id"].clone();
    assert!(chunks.iter().all(|c| c["id"] == id));

    let finished: Vec<&Value> = chunks
        .iter()
        .filter(|c| !c["choices"][0]["finish_reason"].is_null())
        .collect();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0]["choices"][0]["finish_reason"], "stop");
    assert!(std::ptr::eq(finished[0], chunks.last().unwrap()));

    let text: String = chunks
        .iter()
        .filter_map(|c| c["choices"][0]["delta"]["content"].as_str())
        .collect();
    assert!(text.len() > 100);
}

#[tokio::test]
async fn test_streaming_tool_call() {
    let server = TestServer::spawn().await;

    let request = with_persona(chat_request("gpt-4", "Weather?"), "tool_calls", true);
    let frames = server.post_stream("/v1/chat/completions", request).await;
    let chunks: Vec<Value> = frames.iter().filter(|f| !f.is_done()).map(SseFrame::json).collect();

    let announce = chunks
        .iter()
        .find(|c| c["choices"][0]["delta"]["tool_calls"][0]["function"]["name"].is_string())
        .expect("announce chunk");
    assert_eq!(announce["choices"][0]["delta"]["tool_calls"][0]["type"], "function");

    let arguments: String = chunks
        .iter()
        .filter_map(|c| c["choices"][0]["delta"]["tool_calls"][0]["function"]["arguments"].as_str())
        .collect();
    let args: Value = serde_json::from_str(&arguments).unwrap();
    assert!(args.is_object());

    assert_eq!(chunks.last().unwrap()["choices"][0]["finish_reason"], "tool_calls");
}

#[tokio::test]
async fn test_missing_messages_rejected() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/chat/completions", json!({"model": "gpt-4", "messages": []}))
        .await;
    assert_status(&response, 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_unknown_fields_ignored() {
    let server = TestServer::spawn().await;

    let mut request = chat_request("gpt-4", "Hi");
    request["temperature"] = json!(0.2);
    request["top_p"] = json!(0.9);
    request["user"] = json!("test-user");

    let response = server.post("/v1/chat/completions", request).await;
    assert_status(&response, 200);
}
