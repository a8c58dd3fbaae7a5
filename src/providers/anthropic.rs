//! Anthropic messages framing

use serde_json::{json, Value};

use super::{short_id, Frame, FramePlan, ProtocolEmitter};
use crate::engine::{segment, Completion};
use crate::error::SimulatorResult;
use crate::types::*;

/// Anthropic `message` emitter with named SSE events
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicEmitter;

fn event(payload: AnthropicStreamEvent) -> SimulatorResult<Frame> {
    Frame::event(payload.event_name(), &payload)
}

fn stop_reason(content: &ResponseContent) -> &'static str {
    if content.is_tool_call() {
        "tool_use"
    } else {
        "end_turn"
    }
}

fn tool_use_id() -> String {
    format!("toolu_{}", short_id())
}

impl ProtocolEmitter for AnthropicEmitter {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn new_message_id(&self) -> String {
        format!("msg_{}", short_id())
    }

    fn render_document(&self, completion: &Completion) -> SimulatorResult<Value> {
        let mut content = Vec::new();
        let text = completion.content.body();
        if !text.is_empty() || !completion.content.is_tool_call() {
            content.push(AnthropicContentBlock::Text { text: text.to_string() });
        }
        if let Some(call) = completion.content.tool_call() {
            content.push(AnthropicContentBlock::ToolUse {
                id: tool_use_id(),
                name: call.name.clone(),
                input: Value::Object(call.arguments.clone()),
            });
        }

        let response = AnthropicMessagesResponse {
            id: completion.id.clone(),
            response_type: "message".to_string(),
            role: "assistant".to_string(),
            content,
            model: completion.model.clone(),
            stop_reason: Some(stop_reason(&completion.content).to_string()),
            stop_sequence: None,
            usage: AnthropicUsage {
                input_tokens: completion.usage.input,
                output_tokens: completion.usage.output,
            },
        };

        Ok(serde_json::to_value(response)?)
    }

    /// Text block 0 is always opened. A tool call closes it before its
    /// first argument fragment and streams the arguments on block 1.
    fn plan_stream(&self, completion: &Completion) -> SimulatorResult<FramePlan> {
        let opening = vec![
            event(AnthropicStreamEvent::MessageStart {
                message: AnthropicStreamMessage {
                    id: completion.id.clone(),
                    message_type: "message".to_string(),
                    role: "assistant".to_string(),
                    content: Vec::new(),
                    model: completion.model.clone(),
                    stop_reason: None,
                    stop_sequence: None,
                    usage: AnthropicUsage::default(),
                },
            })?,
            event(AnthropicStreamEvent::ContentBlockStart {
                index: 0,
                content_block: AnthropicContentBlockStart::Text { text: String::new() },
            })?,
        ];

        let mut units = Vec::new();
        for token in segment(completion.content.body()) {
            units.push(vec![event(AnthropicStreamEvent::ContentBlockDelta {
                index: 0,
                delta: AnthropicDelta::TextDelta { text: token },
            })?]);
        }

        let mut last_block = 0;
        if let Some(call) = completion.content.tool_call() {
            last_block = 1;
            let mut fragments = segment(&call.arguments_json()).into_iter();
            let mut first = vec![
                event(AnthropicStreamEvent::ContentBlockStop { index: 0 })?,
                event(AnthropicStreamEvent::ContentBlockStart {
                    index: 1,
                    content_block: AnthropicContentBlockStart::ToolUse {
                        id: tool_use_id(),
                        name: call.name.clone(),
                        input: json!({}),
                    },
                })?,
            ];
            if let Some(fragment) = fragments.next() {
                first.push(event(AnthropicStreamEvent::ContentBlockDelta {
                    index: 1,
                    delta: AnthropicDelta::InputJsonDelta { partial_json: fragment },
                })?);
            }
            units.push(first);
            for fragment in fragments {
                units.push(vec![event(AnthropicStreamEvent::ContentBlockDelta {
                    index: 1,
                    delta: AnthropicDelta::InputJsonDelta { partial_json: fragment },
                })?]);
            }
        }

        let closing = vec![
            event(AnthropicStreamEvent::ContentBlockStop { index: last_block })?,
            event(AnthropicStreamEvent::MessageDelta {
                delta: AnthropicMessageDelta {
                    stop_reason: Some(stop_reason(&completion.content).to_string()),
                    stop_sequence: None,
                },
                usage: AnthropicDeltaUsage {
                    output_tokens: completion.usage.output,
                },
            })?,
            event(AnthropicStreamEvent::MessageStop)?,
        ];

        Ok(FramePlan {
            opening,
            units,
            closing,
        })
    }
}
