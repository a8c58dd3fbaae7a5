//! Gemini generate-content framing

use serde_json::Value;

use super::{Frame, FramePlan, ProtocolEmitter};
use crate::engine::{segment, Completion};
use crate::error::SimulatorResult;
use crate::types::*;

const FINISH_STOP: &str = "STOP";

/// Gemini `generateContent` / `streamGenerateContent` emitter
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiEmitter;

impl GeminiEmitter {
    fn candidate(parts: Vec<GeminiPart>, terminal: bool) -> GeminiCandidate {
        GeminiCandidate {
            content: GeminiResponseContent {
                parts,
                role: "model".to_string(),
            },
            finish_reason: terminal.then(|| FINISH_STOP.to_string()),
            index: 0,
            safety_ratings: terminal.then(GeminiSafetyRating::negligible_set),
        }
    }

    /// A response document. Only terminal documents carry the finish
    /// reason, safety ratings and usage metadata.
    fn document(completion: &Completion, parts: Vec<GeminiPart>, terminal: bool) -> GeminiResponse {
        GeminiResponse {
            candidates: vec![Self::candidate(parts, terminal)],
            usage_metadata: terminal
                .then(|| GeminiUsageMetadata::new(completion.usage.input, completion.usage.output)),
            model_version: completion.model.clone(),
        }
    }

    fn full_parts(content: &ResponseContent) -> Vec<GeminiPart> {
        match content {
            ResponseContent::Text { body } => vec![GeminiPart::text(body.clone())],
            ResponseContent::ToolCall { call, .. } => {
                vec![GeminiPart::function_call(call.name.clone(), call.arguments.clone())]
            }
        }
    }
}

impl ProtocolEmitter for GeminiEmitter {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn new_message_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn render_document(&self, completion: &Completion) -> SimulatorResult<Value> {
        let document = Self::document(completion, Self::full_parts(&completion.content), true);
        Ok(serde_json::to_value(document)?)
    }

    /// One frame per token; the last one is terminal. Function calls are
    /// never split and go out as a single terminal frame.
    fn plan_stream(&self, completion: &Completion) -> SimulatorResult<FramePlan> {
        let mut units = Vec::new();

        match &completion.content {
            ResponseContent::Text { body } => {
                let tokens = segment(body);
                if tokens.is_empty() {
                    let document = Self::document(completion, vec![GeminiPart::text("")], true);
                    units.push(vec![Frame::data(&document)?]);
                }
                let last = tokens.len().saturating_sub(1);
                for (i, token) in tokens.into_iter().enumerate() {
                    let document = Self::document(completion, vec![GeminiPart::text(token)], i == last);
                    units.push(vec![Frame::data(&document)?]);
                }
            }
            ResponseContent::ToolCall { .. } => {
                let document = Self::document(completion, Self::full_parts(&completion.content), true);
                units.push(vec![Frame::data(&document)?]);
            }
        }

        Ok(FramePlan {
            opening: Vec::new(),
            units,
            closing: Vec::new(),
        })
    }
}
