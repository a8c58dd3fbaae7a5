//! # LLM-Emulator
//!
//! Offline wire-level emulator for LLM provider APIs.
//!
//! LLM-Emulator answers OpenAI chat completions, Anthropic messages and
//! Gemini generateContent requests with canned persona content, streamed
//! token by token in each provider's exact event framing.
//!
//! ## Features
//!
//! - **Three Wire Protocols**: OpenAI, Anthropic and Gemini, buffered or streamed
//! - **Personas**: named response profiles with text and tool-call variants
//! - **Latency Simulation**: first-unit and per-unit delays with jitter
//! - **Fault Injection**: rate limits, server errors and slowdowns in provider shapes
//! - **Deterministic Execution**: reproducible runs with a seeded random source
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_emulator::{SimulatorConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SimulatorConfig::default();
//!     run_server(config).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod latency;
pub mod persona;
pub mod providers;
pub mod random;
pub mod server;
pub mod telemetry;
pub mod types;

pub use config::SimulatorConfig;
pub use engine::SimulationEngine;
pub use error::{SimulationError, SimulatorResult};
pub use server::run_server;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;
