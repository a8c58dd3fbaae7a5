//! Fault outcomes decided once per request

use serde::{Deserialize, Serialize};

/// Failure kinds a request can be answered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    RateLimit,
    ServerError,
    ContextLength,
    Timeout,
}

impl FaultKind {
    pub const ALL: [FaultKind; 4] = [
        FaultKind::RateLimit,
        FaultKind::ServerError,
        FaultKind::ContextLength,
        FaultKind::Timeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::ContextLength => "context_length",
            Self::Timeout => "timeout",
        }
    }

    /// Parse a sentinel kind. Unrecognized kinds become `ServerError`.
    pub fn from_marker(kind: &str) -> Self {
        match kind.trim() {
            "rate_limit" => Self::RateLimit,
            "context_length" => Self::ContextLength,
            "timeout" => Self::Timeout,
            _ => Self::ServerError,
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the per-request fault decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Normal completion
    None,
    /// Normal completion with scaled latency
    Slowdown,
    /// Short-circuit with a canned provider error
    Fail(FaultKind),
}

impl FaultOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Slowdown => "slowdown",
            Self::Fail(kind) => kind.as_str(),
        }
    }
}
