//! Response content and usage estimation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FaultKind;

/// Prefix of the text variants that stand for a fault instead of content
pub const FAULT_MARKER_PREFIX: &str = "__ERROR__:";

/// A single function call chosen for a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Arguments serialized as a compact JSON string
    pub fn arguments_json(&self) -> String {
        Value::Object(self.arguments.clone()).to_string()
    }
}

/// What a response says
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    /// Plain assistant text
    Text { body: String },
    /// Optional narration followed by one tool call
    ToolCall { text: String, call: ToolInvocation },
}

impl ResponseContent {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    /// The textual part of the response
    pub fn body(&self) -> &str {
        match self {
            Self::Text { body } => body,
            Self::ToolCall { text, .. } => text,
        }
    }

    pub fn tool_call(&self) -> Option<&ToolInvocation> {
        match self {
            Self::Text { .. } => None,
            Self::ToolCall { call, .. } => Some(call),
        }
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Self::ToolCall { .. })
    }

    /// The fault this content stands for, if it is an error sentinel
    pub fn fault_marker(&self) -> Option<FaultKind> {
        match self {
            Self::Text { body } => body
                .trim()
                .strip_prefix(FAULT_MARKER_PREFIX)
                .map(FaultKind::from_marker),
            Self::ToolCall { .. } => None,
        }
    }

    /// Characters the client receives, used for output usage
    pub fn output_chars(&self) -> usize {
        match self {
            Self::Text { body } => body.chars().count(),
            Self::ToolCall { text, call } => {
                text.chars().count() + call.name.chars().count() + call.arguments_json().chars().count()
            }
        }
    }
}

/// Length-based token estimate: a quarter of the character count, at least one
pub fn estimate_tokens(chars: usize) -> u32 {
    (chars / 4).max(1) as u32
}

/// Estimated input and output token counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounts {
    pub input: u32,
    pub output: u32,
}

impl UsageCounts {
    pub fn new(input: u32, output: u32) -> Self {
        Self { input, output }
    }

    pub fn estimate(prompt_chars: usize, content: &ResponseContent) -> Self {
        Self {
            input: estimate_tokens(prompt_chars),
            output: estimate_tokens(content.output_chars()),
        }
    }

    pub fn total(&self) -> u32 {
        self.input + self.output
    }
}
