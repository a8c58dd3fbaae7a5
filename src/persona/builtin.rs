//! Built-in personas, one per category of client rendering behavior

use serde_json::{json, Map, Value};

use super::{PersonaDefinition, ToolCallVariant, DEFAULT_PERSONA, ERRORS_PERSONA, TOOL_CALLS_PERSONA};
use crate::types::FAULT_MARKER_PREFIX;

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn tool(name: &str, arguments: Value) -> ToolCallVariant {
    ToolCallVariant {
        name: name.to_string(),
        arguments: args(arguments),
    }
}

/// General-purpose assistant answers
pub fn default_persona() -> PersonaDefinition {
    PersonaDefinition::new(
        DEFAULT_PERSONA,
        "Friendly general-purpose assistant replies",
        texts(&[
            "Hello! I'm a simulated assistant. How can I help you today?",
            "That's a great question. In short, it depends on your constraints, but a good starting point is to measure before you optimize.",
            "Sure! Here is a brief overview: first gather the requirements, then sketch a design, and finally iterate with feedback from real users.",
            "I understand. Let me know if you'd like me to go into more detail on any part of this.",
        ]),
    )
}

fn concise() -> PersonaDefinition {
    PersonaDefinition::new(
        "concise",
        "One-line answers for fast assertions",
        texts(&["Yes.", "No.", "Done.", "42", "OK"]),
    )
}

fn verbose() -> PersonaDefinition {
    PersonaDefinition::new(
        "verbose",
        "Long multi-paragraph answers for scroll and buffering tests",
        texts(&[
            "Let's walk through this carefully, because there are several moving parts.\n\n\
             First, consider the inputs. Every system is shaped by the data it receives, and the \
             assumptions we make about that data tend to leak into every later decision. It pays to \
             write those assumptions down explicitly.\n\n\
             Second, think about failure. Networks drop packets, disks fill up, and upstream services \
             return errors at the worst possible moment. A robust client retries with backoff, surfaces \
             clear messages, and never loses user work.\n\n\
             Finally, measure. Instrument the critical paths, watch the tail latencies rather than the \
             averages, and revisit the design when the numbers tell you something surprising.",
            "Here is a longer explanation that is deliberately wordy so that streaming clients receive \
             many incremental units. Each word arrives on its own, separated by whitespace units, which \
             lets you observe how your interface renders partial output, how it handles cursor movement, \
             and whether it keeps up when units arrive quickly. If your renderer re-flows the entire \
             message on every delta, you will notice it here.",
        ]),
    )
}

fn code() -> PersonaDefinition {
    PersonaDefinition::new(
        "code",
        "Fenced code blocks in several languages",
        texts(&[
            "Here's a small Rust function:\n\n```rust\nfn fibonacci(n: u64) -> u64 {\n    match n {\n        0 => 0,\n        1 => 1,\n        _ => fibonacci(n - 1) + fibonacci(n - 2),\n    }\n}\n```\n\nIt is exponential, so memoize it for large inputs.",
            "You can do that in Python:\n\n```python\ndef chunked(items, size):\n    for i in range(0, len(items), size):\n        yield items[i:i + size]\n```",
            "Try this shell one-liner:\n\n```bash\nfind . -name '*.log' -mtime +7 -delete\n```",
        ]),
    )
}

fn markdown() -> PersonaDefinition {
    PersonaDefinition::new(
        "markdown",
        "Headings, lists, tables and emphasis",
        texts(&[
            "# Summary\n\n- **Fast**: responses stream immediately\n- *Flexible*: personas are configurable\n- `Simple`: no external services\n\n| Provider | Streaming |\n|---|---|\n| OpenAI | yes |\n| Anthropic | yes |\n| Gemini | yes |",
            "## Steps\n\n1. Install the tool\n2. Point your client at it\n3. Run your tests\n\n> Tip: set a seed for reproducible runs.",
        ]),
    )
}

fn unicode() -> PersonaDefinition {
    PersonaDefinition::new(
        "unicode",
        "Multi-byte text, emoji and right-to-left scripts",
        texts(&[
            "Héllo wörld! 你好，世界！ こんにちは 🌍🚀✨",
            "Ünïcödé tëst: Привет мир, مرحبا بالعالم, שלום עולם 👋🏽",
            "Math: ∑ᵢ xᵢ² ≤ ∞, arrows → ⇒ ↔, and a family emoji 👨‍👩‍👧‍👦",
        ]),
    )
}

fn tool_calls() -> PersonaDefinition {
    PersonaDefinition::new(
        TOOL_CALLS_PERSONA,
        "Always answers with a function call",
        texts(&[
            "Let me check the weather for you.",
            "I'll search the web for that.",
            "I'll look that up in the database.",
        ]),
    )
    .with_tool_calls(vec![
        tool("get_weather", json!({"location": "San Francisco, CA", "unit": "celsius"})),
        tool("search_web", json!({"query": "latest Rust release notes", "max_results": 5})),
        tool("query_database", json!({"table": "orders", "filter": {"status": "pending"}, "limit": 10})),
    ])
}

fn errors() -> PersonaDefinition {
    let sentinel = |kind: &str| format!("{}{}", FAULT_MARKER_PREFIX, kind);
    PersonaDefinition::new(
        ERRORS_PERSONA,
        "Every response is a provider error",
        vec![
            sentinel("rate_limit"),
            sentinel("server_error"),
            sentinel("context_length"),
            sentinel("timeout"),
        ],
    )
}

/// All built-in personas
pub fn builtin_personas() -> Vec<PersonaDefinition> {
    vec![
        default_persona(),
        concise(),
        verbose(),
        code(),
        markdown(),
        unicode(),
        tool_calls(),
        errors(),
    ]
}
