//! Streaming chunk and event shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OpenAIUsage;

/// `chat.completion.chunk` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub system_fingerprint: String,
    pub choices: Vec<ChunkChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<OpenAIUsage>,
}

/// A choice in a streaming chunk; `finish_reason` is always present, null
/// until the terminal chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub logprobs: Option<Value>,
    pub finish_reason: Option<String>,
}

impl ChunkChoice {
    pub fn delta(delta: ChunkDelta) -> Self {
        Self {
            index: 0,
            delta,
            logprobs: None,
            finish_reason: None,
        }
    }

    pub fn finish(reason: &str) -> Self {
        Self {
            index: 0,
            delta: ChunkDelta::default(),
            logprobs: None,
            finish_reason: Some(reason.to_string()),
        }
    }
}

/// Delta content in a streaming chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChunkToolCall>>,
}

impl ChunkDelta {
    /// Role announcement with empty content
    pub fn role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            content: Some(String::new()),
            tool_calls: None,
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn tool_call(call: ChunkToolCall) -> Self {
        Self {
            tool_calls: Some(vec![call]),
            ..Default::default()
        }
    }
}

/// Tool call delta in streaming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkToolCall {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    pub function: ChunkFunctionCall,
}

impl ChunkToolCall {
    /// First tool frame: id, type and name with empty arguments
    pub fn announce(id: &str, name: &str) -> Self {
        Self {
            index: 0,
            id: Some(id.to_string()),
            call_type: Some("function".to_string()),
            function: ChunkFunctionCall {
                name: Some(name.to_string()),
                arguments: Some(String::new()),
            },
        }
    }

    /// Follow-up tool frame carrying one argument fragment
    pub fn fragment(arguments: impl Into<String>) -> Self {
        Self {
            index: 0,
            id: None,
            call_type: None,
            function: ChunkFunctionCall {
                name: None,
                arguments: Some(arguments.into()),
            },
        }
    }
}

/// Function call delta in streaming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// Anthropic streaming event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamEvent {
    MessageStart {
        message: AnthropicStreamMessage,
    },
    ContentBlockStart {
        index: u32,
        content_block: AnthropicContentBlockStart,
    },
    ContentBlockDelta {
        index: u32,
        delta: AnthropicDelta,
    },
    ContentBlockStop {
        index: u32,
    },
    MessageDelta {
        delta: AnthropicMessageDelta,
        usage: AnthropicDeltaUsage,
    },
    MessageStop,
}

impl AnthropicStreamEvent {
    /// The SSE event name for this payload
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::MessageStart { .. } => "message_start",
            Self::ContentBlockStart { .. } => "content_block_start",
            Self::ContentBlockDelta { .. } => "content_block_delta",
            Self::ContentBlockStop { .. } => "content_block_stop",
            Self::MessageDelta { .. } => "message_delta",
            Self::MessageStop => "message_stop",
        }
    }
}

/// Message skeleton sent in `message_start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicStreamMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub role: String,
    pub content: Vec<Value>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
    pub usage: super::AnthropicUsage,
}

/// Content block opened by `content_block_start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlockStart {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
}

/// Anthropic delta
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicDelta {
    TextDelta { text: String },
    InputJsonDelta { partial_json: String },
}

/// Anthropic message delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessageDelta {
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnthropicDeltaUsage {
    pub output_tokens: u32,
}
