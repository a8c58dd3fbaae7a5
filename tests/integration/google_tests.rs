//! Gemini API endpoint integration tests

use super::common::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_generate_content_basic() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1beta/models/gemini-1.5-pro:generateContent", gemini_request("Hello"))
        .await;
    assert_status(&response, 200);

    let body: Value = response.json().await.unwrap();
    assert_json_field(&body, "candidates");
    assert_json_field(&body, "usageMetadata");
    assert_eq!(body["modelVersion"], "gemini-1.5-pro");

    let candidate = &body["candidates"][0];
    assert_eq!(candidate["content"]["role"], "model");
    assert!(!candidate["content"]["parts"][0]["text"].as_str().unwrap().is_empty());
    assert_eq!(candidate["finishReason"], "STOP");

    let usage = &body["usageMetadata"];
    assert_eq!(
        usage["totalTokenCount"].as_u64().unwrap(),
        usage["promptTokenCount"].as_u64().unwrap() + usage["candidatesTokenCount"].as_u64().unwrap()
    );
}

#[tokio::test]
async fn test_v1_path_alias() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1/models/gemini-pro:generateContent", gemini_request("Hello"))
        .await;
    assert_status(&response, 200);
}

#[tokio::test]
async fn test_function_call_document() {
    let server = TestServer::spawn().await;

    let request = with_persona(gemini_request("Weather?"), "tool_calls", false);
    let body: Value = server
        .post("/v1beta/models/gemini-pro:generateContent", request)
        .await
        .json()
        .await
        .unwrap();

    let part = &body["candidates"][0]["content"]["parts"][0];
    assert!(part["functionCall"]["name"].is_string());
    assert!(part["functionCall"]["args"].is_object());
}

#[tokio::test]
async fn test_stream_only_last_frame_terminal() {
    let server = TestServer::spawn().await;

    let frames = server
        .post_stream("/v1beta/models/gemini-1.5-flash:streamGenerateContent", gemini_request("Hello"))
        .await;
    assert!(frames.len() > 1);
    assert!(frames.iter().all(|f| f.event.is_none() && !f.is_done()));

    let documents: Vec<Value> = frames.iter().map(SseFrame::json).collect();
    let (last, rest) = documents.split_last().unwrap();

    for document in rest {
        assert!(document.get("usageMetadata").is_none());
        assert!(document["candidates"][0].get("finishReason").is_none());
    }
    assert_eq!(last["candidates"][0]["finishReason"], "STOP");
    assert!(last["usageMetadata"]["totalTokenCount"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_stream_function_call_single_frame() {
    let server = TestServer::spawn().await;

    let request = with_persona(gemini_request("Weather?"), "tool_calls", false);
    let frames = server
        .post_stream("/v1beta/models/gemini-pro:streamGenerateContent", request)
        .await;

    assert_eq!(frames.len(), 1);
    let document = frames[0].json();
    assert!(document["candidates"][0]["content"]["parts"][0]["functionCall"].is_object());
    assert_eq!(document["candidates"][0]["finishReason"], "STOP");
}

#[tokio::test]
async fn test_empty_contents_rejected() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1beta/models/gemini-pro:generateContent", json!({"contents": []}))
        .await;
    assert_status(&response, 400);
}

#[tokio::test]
async fn test_unknown_action_not_found() {
    let server = TestServer::spawn().await;

    let response = server
        .post("/v1beta/models/gemini-pro:embedContent", gemini_request("Hello"))
        .await;
    assert_status(&response, 404);
}
