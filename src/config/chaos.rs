//! Fault injection configuration

use serde::{Deserialize, Serialize};
use crate::error::{SimulationError, SimulatorResult};

/// Fault injection configuration
///
/// Probabilities are evaluated as cumulative bands in the order
/// rate-limit, server-error, slowdown. If they sum past 1.0 the later
/// bands are simply truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosConfig {
    /// Enable fault injection
    pub enabled: bool,
    /// Probability of answering with a rate-limit error (0.0-1.0)
    pub rate_limit_probability: f64,
    /// Probability of answering with a server error (0.0-1.0)
    pub server_error_probability: f64,
    /// Probability of completing normally with scaled latency (0.0-1.0)
    pub slowdown_probability: f64,
    /// Latency multiplier applied on slowdown
    pub slowdown_multiplier: f64,
    /// Value of the `retry-after` header on rate-limit responses
    pub retry_after_secs: u64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rate_limit_probability: 0.0,
            server_error_probability: 0.0,
            slowdown_probability: 0.0,
            slowdown_multiplier: 3.0,
            retry_after_secs: 20,
        }
    }
}

fn check_probability(value: f64, param: &str) -> SimulatorResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::Validation {
            message: format!("{} must be between 0.0 and 1.0", param),
            param: Some(format!("chaos.{}", param)),
        });
    }
    Ok(())
}

impl ChaosConfig {
    pub fn validate(&self) -> SimulatorResult<()> {
        check_probability(self.rate_limit_probability, "rate_limit_probability")?;
        check_probability(self.server_error_probability, "server_error_probability")?;
        check_probability(self.slowdown_probability, "slowdown_probability")?;
        if !self.slowdown_multiplier.is_finite() || self.slowdown_multiplier < 1.0 {
            return Err(SimulationError::Validation {
                message: "slowdown_multiplier must be >= 1.0".to_string(),
                param: Some("chaos.slowdown_multiplier".to_string()),
            });
        }
        Ok(())
    }

    /// Check if fault injection can produce any outcome
    pub fn is_active(&self) -> bool {
        self.enabled
            && (self.rate_limit_probability > 0.0
                || self.server_error_probability > 0.0
                || self.slowdown_probability > 0.0)
    }
}

/// Predefined fault scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaosScenario {
    /// No faults
    None,
    /// Frequent rate limiting
    RateLimitStress,
    /// Mixed server errors and rate limits
    PartialOutage,
    /// Frequent slowdowns, no errors
    HighLatency,
    /// Every request fails
    FullOutage,
}

impl ChaosScenario {
    /// Apply a predefined scenario to the chaos config
    pub fn apply(&self, config: &mut ChaosConfig) {
        let (enabled, rate_limit, server_error, slowdown) = match self {
            Self::None => (false, 0.0, 0.0, 0.0),
            Self::RateLimitStress => (true, 0.3, 0.0, 0.0),
            Self::PartialOutage => (true, 0.1, 0.25, 0.1),
            Self::HighLatency => (true, 0.0, 0.0, 0.5),
            Self::FullOutage => (true, 0.0, 1.0, 0.0),
        };
        config.enabled = enabled;
        config.rate_limit_probability = rate_limit;
        config.server_error_probability = server_error;
        config.slowdown_probability = slowdown;
    }
}

impl std::str::FromStr for ChaosScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(Self::None),
            "rate_limit_stress" => Ok(Self::RateLimitStress),
            "partial_outage" => Ok(Self::PartialOutage),
            "high_latency" => Ok(Self::HighLatency),
            "full_outage" => Ok(Self::FullOutage),
            _ => Err(format!("Unknown chaos scenario: {}", s)),
        }
    }
}
