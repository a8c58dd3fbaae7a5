//! Protocol emitters
//!
//! One emitter per provider owns that provider's exact framing: field
//! names, nesting, event names, terminal markers and where usage goes. Each
//! emitter renders a complete JSON document for single-shot requests and a
//! [`FramePlan`] for streaming requests. Emitters are pure; pacing and
//! liveness belong to the streaming orchestrator.

mod anthropic;
mod google;
mod openai;

pub use anthropic::*;
pub use google::*;
pub use openai::*;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::engine::Completion;
use crate::error::SimulatorResult;
use crate::types::Provider;

/// One wire-level unit of a server-sent event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `data: <json>\n\n`
    Data(String),
    /// `event: <name>\ndata: <json>\n\n`
    Event { name: &'static str, data: String },
    /// `data: [DONE]\n\n`
    Done,
}

impl Frame {
    pub fn data<T: Serialize>(payload: &T) -> SimulatorResult<Self> {
        Ok(Self::Data(serde_json::to_string(payload)?))
    }

    pub fn event<T: Serialize>(name: &'static str, payload: &T) -> SimulatorResult<Self> {
        Ok(Self::Event {
            name,
            data: serde_json::to_string(payload)?,
        })
    }

    /// The JSON payload, if the frame has one
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Data(data) | Self::Event { data, .. } => Some(data),
            Self::Done => None,
        }
    }

    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            Self::Event { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Exact bytes written to the connection
    pub fn to_wire(&self) -> String {
        match self {
            Self::Data(data) => format!("data: {}\n\n", data),
            Self::Event { name, data } => format!("event: {}\ndata: {}\n\n", name, data),
            Self::Done => "data: [DONE]\n\n".to_string(),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_wire())
    }
}

/// Every frame of one stream, grouped by orchestrator phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramePlan {
    /// Written once on announcement
    pub opening: Vec<Frame>,
    /// One entry per paced unit; each entry is written as a group
    pub units: Vec<Vec<Frame>>,
    /// Terminal frames, written once after the last unit
    pub closing: Vec<Frame>,
}

impl FramePlan {
    /// All frames in wire order
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.opening
            .iter()
            .chain(self.units.iter().flatten())
            .chain(self.closing.iter())
    }

    pub fn frame_count(&self) -> usize {
        self.frames().count()
    }

    /// The whole stream as it appears on the wire
    pub fn to_wire(&self) -> String {
        self.frames().map(Frame::to_wire).collect()
    }
}

/// Framing rules of one provider
pub trait ProtocolEmitter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Fresh identifier in the provider's format
    fn new_message_id(&self) -> String;

    /// Single-shot response document
    fn render_document(&self, completion: &Completion) -> SimulatorResult<Value>;

    /// Streaming response frames
    fn plan_stream(&self, completion: &Completion) -> SimulatorResult<FramePlan>;
}

static OPENAI: OpenAIEmitter = OpenAIEmitter;
static ANTHROPIC: AnthropicEmitter = AnthropicEmitter;
static GEMINI: GeminiEmitter = GeminiEmitter;

/// The emitter for `provider`
pub fn emitter_for(provider: Provider) -> &'static dyn ProtocolEmitter {
    match provider {
        Provider::OpenAI => &OPENAI,
        Provider::Anthropic => &ANTHROPIC,
        Provider::Gemini => &GEMINI,
    }
}

/// 24 hex characters for provider-style ids
pub(crate) fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..24].to_string()
}
