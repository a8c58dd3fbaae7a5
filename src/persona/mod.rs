//! Persona catalog
//!
//! A persona is a named, static profile of canned response content. The
//! catalog is built once at startup from the built-in personas plus any
//! declared in configuration, validated, and never mutated afterwards.
//! Lookups never fail: unknown names resolve to a fallback.

mod builtin;
mod selector;

pub use builtin::*;
pub use selector::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{SimulationError, SimulatorResult};

/// Name of the persona every catalog is guaranteed to contain
pub const DEFAULT_PERSONA: &str = "default";

/// Name of the persona that always answers with a tool call
pub const TOOL_CALLS_PERSONA: &str = "tool_calls";

/// Name of the persona whose variants are fault sentinels
pub const ERRORS_PERSONA: &str = "errors";

/// One canned tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallVariant {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// A named response profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub texts: Vec<String>,
    /// Paired with `texts` by index when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallVariant>>,
}

impl PersonaDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            texts,
            tool_calls: None,
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallVariant>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    pub fn validate(&self) -> SimulatorResult<()> {
        let param = Some(format!("personas.{}", self.name));
        if self.name.trim().is_empty() {
            return Err(SimulationError::Validation {
                message: "persona name cannot be empty".to_string(),
                param: Some("personas".to_string()),
            });
        }
        if self.texts.is_empty() {
            return Err(SimulationError::Validation {
                message: format!("persona '{}' has no text variants", self.name),
                param,
            });
        }
        if let Some(tools) = &self.tool_calls {
            if tools.len() != self.texts.len() {
                return Err(SimulationError::Validation {
                    message: format!(
                        "persona '{}' has {} text variants but {} tool-call variants",
                        self.name,
                        self.texts.len(),
                        tools.len()
                    ),
                    param,
                });
            }
            if tools.iter().any(|t| t.name.trim().is_empty()) {
                return Err(SimulationError::Validation {
                    message: format!("persona '{}' has a tool call without a name", self.name),
                    param,
                });
            }
        }
        Ok(())
    }
}

/// Immutable registry of personas
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: HashMap<String, PersonaDefinition>,
    fallback: PersonaDefinition,
}

impl PersonaCatalog {
    /// Built-in personas overlaid with `extra`. Later definitions replace
    /// earlier ones with the same name.
    pub fn new(extra: Vec<PersonaDefinition>) -> SimulatorResult<Self> {
        let mut personas = HashMap::new();
        for persona in builtin_personas().into_iter().chain(extra) {
            persona.validate()?;
            personas.insert(persona.name.clone(), persona);
        }

        let fallback = personas
            .get(DEFAULT_PERSONA)
            .cloned()
            .unwrap_or_else(default_persona);

        Ok(Self { personas, fallback })
    }

    /// Catalog containing only the built-in personas
    pub fn builtin() -> Self {
        let personas: HashMap<_, _> = builtin_personas()
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();
        Self {
            personas,
            fallback: default_persona(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PersonaDefinition> {
        self.personas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.personas.contains_key(name)
    }

    /// The hinted persona, else `fallback`, else the built-in default
    pub fn resolve(&self, hint: Option<&str>, fallback: &str) -> &PersonaDefinition {
        hint.and_then(|name| self.personas.get(name))
            .or_else(|| self.personas.get(fallback))
            .unwrap_or(&self.fallback)
    }

    /// Persona names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.personas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Personas in name order
    pub fn iter(&self) -> impl Iterator<Item = &PersonaDefinition> {
        let mut personas: Vec<&PersonaDefinition> = self.personas.values().collect();
        personas.sort_by(|a, b| a.name.cmp(&b.name));
        personas.into_iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
