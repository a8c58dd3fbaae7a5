//! Configuration module
//!
//! Provides layered configuration:
//! - YAML/TOML/JSON config files
//! - Environment variable overrides
//! - Validation

mod chaos;
mod latency;

pub use chaos::*;
pub use latency::*;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{SimulationError, SimulatorResult};
use crate::persona::{PersonaCatalog, PersonaDefinition, DEFAULT_PERSONA};

/// Prefix of every environment variable the emulator reads
pub const ENV_PREFIX: &str = "LLM_EMULATOR_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Latency simulation settings
    pub latency: LatencyConfig,
    /// Fault injection settings
    pub chaos: ChaosConfig,
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
    /// Persona used when a request carries no `_persona` override
    pub default_persona: String,
    /// Extra personas, merged over the built-in ones
    pub personas: Vec<PersonaDefinition>,
    /// Seed for deterministic behavior (None = random)
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            latency: LatencyConfig::default(),
            chaos: ChaosConfig::default(),
            telemetry: TelemetryConfig::default(),
            default_persona: DEFAULT_PERSONA.to_string(),
            personas: Vec::new(),
            seed: None,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, name)).ok()
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> SimulatorResult<T> {
    raw.trim().parse().map_err(|_| {
        SimulationError::Config(format!("Invalid value for {}{}: {}", ENV_PREFIX, name, raw))
    })
}

impl SimulatorConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimulatorResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimulationError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| SimulationError::Config(format!("YAML parse error: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| SimulationError::Config(format!("TOML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| SimulationError::Config(format!("JSON parse error: {}", e)))?,
            _ => return Err(SimulationError::Config(
                "Unsupported config file format. Use .yaml, .toml, or .json".to_string()
            )),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> SimulatorResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LLM_EMULATOR_*` overrides on top of the current values
    pub fn apply_env(&mut self) -> SimulatorResult<()> {
        if let Some(port) = env_var("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(host) = env_var("HOST") {
            self.server.host = host;
        }
        if let Some(seed) = env_var("SEED") {
            self.seed = Some(parse_env("SEED", &seed)?);
        }
        if let Some(persona) = env_var("DEFAULT_PERSONA") {
            self.default_persona = persona;
        }
        if let Some(val) = env_var("LATENCY_ENABLED") {
            self.latency.enabled = parse_env("LATENCY_ENABLED", &val)?;
        }
        if let Some(val) = env_var("CHAOS_ENABLED") {
            self.chaos.enabled = parse_env("CHAOS_ENABLED", &val)?;
        }
        if let Some(val) = env_var("RATE_LIMIT_PROBABILITY") {
            self.chaos.rate_limit_probability = parse_env("RATE_LIMIT_PROBABILITY", &val)?;
        }
        if let Some(val) = env_var("SERVER_ERROR_PROBABILITY") {
            self.chaos.server_error_probability = parse_env("SERVER_ERROR_PROBABILITY", &val)?;
        }
        if let Some(val) = env_var("SLOWDOWN_PROBABILITY") {
            self.chaos.slowdown_probability = parse_env("SLOWDOWN_PROBABILITY", &val)?;
        }
        if let Some(level) = env_var("LOG_LEVEL") {
            self.telemetry.log_level = level;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> SimulatorResult<()> {
        self.server.validate()?;
        self.latency.validate()?;
        self.chaos.validate()?;

        let catalog = self.persona_catalog()?;
        if !catalog.contains(&self.default_persona) {
            return Err(SimulationError::Validation {
                message: format!("default persona '{}' is not defined", self.default_persona),
                param: Some("default_persona".to_string()),
            });
        }

        Ok(())
    }

    /// Build the persona catalog this configuration describes
    pub fn persona_catalog(&self) -> SimulatorResult<PersonaCatalog> {
        PersonaCatalog::new(self.personas.clone())
    }

    /// Configuration for tests: no waiting, reproducible randomness
    pub fn instant() -> Self {
        Self {
            latency: LatencyPreset::Instant.config(),
            seed: Some(0),
            ..Self::default()
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable permissive CORS
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> SimulatorResult<()> {
        if self.port == 0 {
            return Err(SimulationError::Validation {
                message: "Port cannot be 0".to_string(),
                param: Some("server.port".to_string()),
            });
        }
        self.socket_addr().map(|_| ())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> SimulatorResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| SimulationError::Validation {
                message: format!("Invalid bind address {}:{}", self.host, self.port),
                param: Some("server.host".to_string()),
            })
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable log output
    pub enabled: bool,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Service name reported at startup
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "llm-emulator".to_string(),
        }
    }
}
