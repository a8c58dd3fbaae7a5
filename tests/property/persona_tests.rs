//! Property-based tests for persona resolution and content selection

use proptest::prelude::*;

use llm_emulator::persona::{select_content, PersonaCatalog, DEFAULT_PERSONA, TOOL_CALLS_PERSONA};
use llm_emulator::random::ScriptedRandom;
use llm_emulator::types::ResponseContent;

proptest! {
    /// Resolution never fails and unknown names fall back to the default
    #[test]
    fn test_resolve_total(hint in "[a-z_]{0,12}") {
        let catalog = PersonaCatalog::builtin();
        let persona = catalog.resolve(Some(&hint), DEFAULT_PERSONA);

        if catalog.contains(&hint) {
            prop_assert_eq!(&persona.name, &hint);
        } else {
            prop_assert_eq!(persona.name.as_str(), DEFAULT_PERSONA);
        }
    }

    /// Tool mode pairs the text and tool-call variants at the same index
    #[test]
    fn test_tool_variants_pair_by_index(draw in 0.0f64..1.0) {
        let catalog = PersonaCatalog::builtin();
        let persona = catalog.get(TOOL_CALLS_PERSONA).unwrap();
        let tools = persona.tool_calls.as_ref().unwrap();

        let content = select_content(persona, false, &ScriptedRandom::constant(draw));
        match content {
            ResponseContent::ToolCall { text, call } => {
                let idx = persona.texts.iter().position(|t| *t == text).unwrap();
                prop_assert_eq!(&call.name, &tools[idx].name);
                prop_assert_eq!(&call.arguments, &tools[idx].arguments);
            }
            other => prop_assert!(false, "expected a tool call, got {:?}", other),
        }
    }

    /// Text selection always returns one of the persona's variants
    #[test]
    fn test_text_selection_from_variants(draw in 0.0f64..1.0, tools in any::<bool>()) {
        let catalog = PersonaCatalog::builtin();
        for name in ["default", "concise", "verbose", "code", "markdown", "unicode"] {
            let persona = catalog.get(name).unwrap();
            let content = select_content(persona, tools, &ScriptedRandom::constant(draw));
            prop_assert!(!content.is_tool_call());
            prop_assert!(persona.texts.iter().any(|t| t.as_str() == content.body()));
        }
    }
}

#[test]
fn test_tool_personas_have_matching_lengths() {
    let catalog = PersonaCatalog::builtin();
    for persona in catalog.iter() {
        if let Some(tools) = &persona.tool_calls {
            assert_eq!(tools.len(), persona.texts.len(), "persona {}", persona.name);
        }
    }
}
