//! Request bodies accepted on each provider route
//!
//! Only the fields the emulator acts on are modelled; everything else a
//! client sends is ignored by serde. Each body also accepts `_persona`,
//! which overrides the configured default persona for that request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Provider;
use crate::error::{SimulationError, SimulatorResult};

/// Provider-neutral view of a request, consumed by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub provider: Provider,
    pub model: String,
    pub persona_hint: Option<String>,
    pub declares_tools: bool,
    pub stream: bool,
    /// Characters of prompt text, used for input usage
    pub prompt_chars: usize,
}

impl SimulationRequest {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            persona_hint: None,
            declares_tools: false,
            stream: false,
            prompt_chars: 0,
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona_hint = Some(persona.into());
        self
    }

    pub fn with_tools(mut self, declares_tools: bool) -> Self {
        self.declares_tools = declares_tools;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_prompt_chars(mut self, prompt_chars: usize) -> Self {
        self.prompt_chars = prompt_chars;
        self
    }
}

/// Message content: a plain string or an array of typed parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<Value>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl MessageContent {
    /// Concatenated text of all text-bearing parts
    pub fn text(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Parts(parts) => parts.iter().map(part_text).collect(),
        }
    }
}

fn part_text(part: &Value) -> String {
    match part {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("text") {
            Some(Value::String(s)) => s.clone(),
            _ => match obj.get("content") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Array(items)) => items.iter().map(part_text).collect(),
                _ => String::new(),
            },
        },
        _ => String::new(),
    }
}

fn has_tools(tools: &Option<Vec<Value>>) -> bool {
    tools.as_ref().map(|t| !t.is_empty()).unwrap_or(false)
}

fn require_model(model: &str) -> SimulatorResult<()> {
    if model.trim().is_empty() {
        return Err(SimulationError::Validation {
            message: "model is required".to_string(),
            param: Some("model".to_string()),
        });
    }
    Ok(())
}

/// A chat message in the chat-completion and message styles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl ChatMessage {
    pub fn text(&self) -> String {
        self.content.as_ref().map(|c| c.text()).unwrap_or_default()
    }
}

/// `POST /v1/chat/completions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(rename = "_persona", default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

impl ChatCompletionRequest {
    pub fn validate(&self) -> SimulatorResult<()> {
        require_model(&self.model)?;
        if self.messages.is_empty() {
            return Err(SimulationError::Validation {
                message: "messages must contain at least one message".to_string(),
                param: Some("messages".to_string()),
            });
        }
        Ok(())
    }

    pub fn to_simulation(&self) -> SimulationRequest {
        let prompt_chars = self.messages.iter().map(|m| m.text().chars().count()).sum();
        SimulationRequest {
            provider: Provider::OpenAI,
            model: self.model.clone(),
            persona_hint: self.persona.clone(),
            declares_tools: has_tools(&self.tools),
            stream: self.stream,
            prompt_chars,
        }
    }
}

/// `POST /v1/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessagesRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// A string or an array of text blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<MessageContent>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(rename = "_persona", default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

impl AnthropicMessagesRequest {
    pub fn validate(&self) -> SimulatorResult<()> {
        require_model(&self.model)?;
        if self.messages.is_empty() {
            return Err(SimulationError::Validation {
                message: "messages: at least one message is required".to_string(),
                param: Some("messages".to_string()),
            });
        }
        if self.max_tokens == Some(0) {
            return Err(SimulationError::Validation {
                message: "max_tokens: must be greater than or equal to 1".to_string(),
                param: Some("max_tokens".to_string()),
            });
        }
        Ok(())
    }

    pub fn to_simulation(&self) -> SimulationRequest {
        let system_chars = self
            .system
            .as_ref()
            .map(|s| s.text().chars().count())
            .unwrap_or(0);
        let message_chars: usize = self.messages.iter().map(|m| m.text().chars().count()).sum();
        SimulationRequest {
            provider: Provider::Anthropic,
            model: self.model.clone(),
            persona_hint: self.persona.clone(),
            declares_tools: has_tools(&self.tools),
            stream: self.stream,
            prompt_chars: system_chars + message_chars,
        }
    }
}

/// A content entry in a generate-content request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Value>,
}

impl GeminiContent {
    pub fn text(&self) -> String {
        self.parts.iter().map(part_text).collect()
    }
}

/// `POST /v1beta/models/{model}:generateContent` and `:streamGenerateContent`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<Value>,
    #[serde(rename = "_persona", default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

impl GeminiRequest {
    pub fn validate(&self) -> SimulatorResult<()> {
        if self.contents.is_empty() {
            return Err(SimulationError::Validation {
                message: "contents is not specified".to_string(),
                param: Some("contents".to_string()),
            });
        }
        Ok(())
    }

    /// The model comes from the route, not the body
    pub fn to_simulation(&self, model: &str, stream: bool) -> SimulationRequest {
        let system_chars = self
            .system_instruction
            .as_ref()
            .map(|s| s.text().chars().count())
            .unwrap_or(0);
        let content_chars: usize = self.contents.iter().map(|c| c.text().chars().count()).sum();
        SimulationRequest {
            provider: Provider::Gemini,
            model: model.to_string(),
            persona_hint: self.persona.clone(),
            declares_tools: has_tools(&self.tools),
            stream,
            prompt_chars: system_chars + content_chars,
        }
    }
}
