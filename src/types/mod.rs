//! Core data types
//!
//! Request bodies for the three emulated providers, the response content
//! model, fault outcomes, per-stream session state, and the wire-level
//! document and chunk shapes the emitters serialize.

mod content;
mod fault;
mod request;
mod response;
mod session;
mod streaming;

pub use content::*;
pub use fault::*;
pub use request::*;
pub use response::*;
pub use session::*;
pub use streaming::*;

use serde::{Deserialize, Serialize};

/// Emulated LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAI,
    Anthropic,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAI, Provider::Anthropic, Provider::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}
