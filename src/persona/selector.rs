//! Content selection

use super::{PersonaDefinition, TOOL_CALLS_PERSONA};
use crate::random::RandomSource;
use crate::types::{ResponseContent, ToolInvocation};

/// Whether a request should be answered with a tool call
pub fn wants_tool_call(persona: &PersonaDefinition, declares_tools: bool) -> bool {
    (declares_tools || persona.name == TOOL_CALLS_PERSONA) && persona.has_tool_calls()
}

/// Pick one content variant for `persona`.
///
/// Tool mode picks one index and pairs the text and tool-call variants at
/// that index. Otherwise a text variant is picked uniformly.
pub fn select_content(
    persona: &PersonaDefinition,
    declares_tools: bool,
    rng: &dyn RandomSource,
) -> ResponseContent {
    if wants_tool_call(persona, declares_tools) {
        if let Some(tools) = persona.tool_calls.as_deref() {
            let idx = rng.next_index(tools.len().min(persona.texts.len()));
            let variant = &tools[idx];
            return ResponseContent::ToolCall {
                text: persona.texts[idx].clone(),
                call: ToolInvocation::new(variant.name.clone(), variant.arguments.clone()),
            };
        }
    }

    let body = if persona.texts.is_empty() {
        String::new()
    } else {
        persona.texts[rng.next_index(persona.texts.len())].clone()
    };
    ResponseContent::Text { body }
}
