//! OpenAI chat-completions framing

use serde_json::Value;

use super::{short_id, Frame, FramePlan, ProtocolEmitter};
use crate::engine::{segment, Completion};
use crate::error::SimulatorResult;
use crate::types::*;

/// OpenAI `chat.completion` / `chat.completion.chunk` emitter
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAIEmitter;

impl OpenAIEmitter {
    fn fingerprint() -> String {
        format!("fp_{}", &short_id()[..10])
    }

    fn call_id() -> String {
        format!("call_{}", short_id())
    }

    fn finish_reason(content: &ResponseContent) -> &'static str {
        if content.is_tool_call() {
            "tool_calls"
        } else {
            "stop"
        }
    }

    fn chunk(completion: &Completion, fingerprint: &str, choice: ChunkChoice) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: completion.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: completion.created,
            model: completion.model.clone(),
            system_fingerprint: fingerprint.to_string(),
            choices: vec![choice],
            usage: None,
        }
    }
}

impl ProtocolEmitter for OpenAIEmitter {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn new_message_id(&self) -> String {
        format!("chatcmpl-{}", uuid::Uuid::new_v4().simple())
    }

    fn render_document(&self, completion: &Completion) -> SimulatorResult<Value> {
        let message = match &completion.content {
            ResponseContent::Text { body } => ResponseMessage {
                role: "assistant".to_string(),
                content: Some(body.clone()),
                tool_calls: None,
            },
            ResponseContent::ToolCall { call, .. } => ResponseMessage {
                role: "assistant".to_string(),
                content: None,
                tool_calls: Some(vec![ResponseToolCall {
                    id: Self::call_id(),
                    call_type: "function".to_string(),
                    function: ResponseFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments_json(),
                    },
                }]),
            },
        };

        let response = ChatCompletionResponse {
            id: completion.id.clone(),
            object: "chat.completion".to_string(),
            created: completion.created,
            model: completion.model.clone(),
            choices: vec![ChatCompletionChoice {
                index: 0,
                message,
                logprobs: None,
                finish_reason: Self::finish_reason(&completion.content).to_string(),
            }],
            usage: OpenAIUsage::new(completion.usage.input, completion.usage.output),
            system_fingerprint: Self::fingerprint(),
        };

        Ok(serde_json::to_value(response)?)
    }

    fn plan_stream(&self, completion: &Completion) -> SimulatorResult<FramePlan> {
        let fingerprint = Self::fingerprint();
        let chunk = |choice| Self::chunk(completion, &fingerprint, choice);

        let mut opening = vec![Frame::data(&chunk(ChunkChoice::delta(ChunkDelta::role("assistant"))))?];
        let mut units = Vec::new();

        match &completion.content {
            ResponseContent::Text { body } => {
                for token in segment(body) {
                    units.push(vec![Frame::data(&chunk(ChunkChoice::delta(ChunkDelta::content(token))))?]);
                }
            }
            ResponseContent::ToolCall { call, .. } => {
                let announce = ChunkToolCall::announce(&Self::call_id(), &call.name);
                opening.push(Frame::data(&chunk(ChunkChoice::delta(ChunkDelta::tool_call(announce))))?);
                for fragment in segment(&call.arguments_json()) {
                    let delta = ChunkDelta::tool_call(ChunkToolCall::fragment(fragment));
                    units.push(vec![Frame::data(&chunk(ChunkChoice::delta(delta)))?]);
                }
            }
        }

        let mut terminal = chunk(ChunkChoice::finish(Self::finish_reason(&completion.content)));
        if !completion.content.is_tool_call() {
            terminal.usage = Some(OpenAIUsage::new(completion.usage.input, completion.usage.output));
        }

        Ok(FramePlan {
            opening,
            units,
            closing: vec![Frame::data(&terminal)?, Frame::Done],
        })
    }
}
