//! CLI Module for the LLM Emulator
//!
//! Subcommands for:
//! - Starting the emulator server
//! - Listing personas
//! - Showing and validating configuration

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ChaosScenario, LatencyPreset};
use crate::VERSION;

/// LLM Emulator: wire-level stand-in for LLM provider APIs
#[derive(Parser, Debug)]
#[command(name = "llm-emulator")]
#[command(author = "LLM DevOps Team")]
#[command(version = VERSION)]
#[command(about = "Emulates the OpenAI, Anthropic and Gemini streaming APIs with canned content, latency and faults")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path (YAML, TOML, or JSON)
    #[arg(short, long, global = true, env = "LLM_EMULATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LLM_EMULATOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON log output
    #[arg(long, global = true, env = "LLM_EMULATOR_JSON_LOGS")]
    pub json_logs: bool,

    /// Quiet mode - suppress banner and non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the emulator server
    #[command(alias = "s")]
    Serve(ServeCommand),

    /// List the available personas
    Personas(PersonasCommand),

    /// Configuration management
    #[command(alias = "cfg")]
    Config(ConfigCommand),

    /// Show version information
    Version,
}

/// Start the emulator server. Flags override the configuration file.
#[derive(Parser, Debug, Default)]
pub struct ServeCommand {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Fixed seed for reproducible content, jitter and faults
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable fault injection
    #[arg(long)]
    pub chaos: bool,

    /// Fault scenario preset (none, rate-limit-stress, partial-outage, high-latency, full-outage)
    #[arg(long)]
    pub scenario: Option<ChaosScenario>,

    /// Rate-limit probability (0.0-1.0)
    #[arg(long)]
    pub rate_limit_probability: Option<f64>,

    /// Server-error probability (0.0-1.0)
    #[arg(long)]
    pub server_error_probability: Option<f64>,

    /// Slowdown probability (0.0-1.0)
    #[arg(long)]
    pub slowdown_probability: Option<f64>,

    /// Latency profile (fast, standard, slow, instant)
    #[arg(long)]
    pub latency_profile: Option<LatencyPreset>,

    /// Disable latency simulation
    #[arg(long)]
    pub no_latency: bool,

    /// Persona used when requests carry no `_persona`
    #[arg(long)]
    pub persona: Option<String>,
}

/// List the available personas
#[derive(Parser, Debug)]
pub struct PersonasCommand {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output format (yaml, toml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file to validate
        file: PathBuf,
    },
}
