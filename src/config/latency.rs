//! Latency simulation configuration

use serde::{Deserialize, Serialize};
use crate::error::{SimulationError, SimulatorResult};

/// Latency simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Enable latency simulation
    pub enabled: bool,
    /// Base delay before the first unit (milliseconds)
    pub first_unit_ms: f64,
    /// Base delay before every following unit (milliseconds)
    pub per_unit_ms: f64,
    /// Relative jitter applied to both bases (0.0-1.0)
    pub variance: f64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        LatencyPreset::Standard.config()
    }
}

impl LatencyConfig {
    pub fn validate(&self) -> SimulatorResult<()> {
        if !self.first_unit_ms.is_finite() || self.first_unit_ms < 0.0 {
            return Err(SimulationError::Validation {
                message: "first_unit_ms must be a non-negative number".to_string(),
                param: Some("latency.first_unit_ms".to_string()),
            });
        }
        if !self.per_unit_ms.is_finite() || self.per_unit_ms < 0.0 {
            return Err(SimulationError::Validation {
                message: "per_unit_ms must be a non-negative number".to_string(),
                param: Some("latency.per_unit_ms".to_string()),
            });
        }
        if !(0.0..=1.0).contains(&self.variance) {
            return Err(SimulationError::Validation {
                message: "variance must be between 0.0 and 1.0".to_string(),
                param: Some("latency.variance".to_string()),
            });
        }
        Ok(())
    }
}

/// Named latency presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyPreset {
    /// Local or edge deployment
    Fast,
    /// Typical hosted API
    Standard,
    /// Congested or distant endpoint
    Slow,
    /// No waiting at all
    Instant,
}

impl LatencyPreset {
    /// Build the configuration this preset describes
    pub fn config(&self) -> LatencyConfig {
        let (first_unit_ms, per_unit_ms, variance) = match self {
            Self::Fast => (80.0, 10.0, 0.2),
            Self::Standard => (250.0, 30.0, 0.25),
            Self::Slow => (800.0, 70.0, 0.3),
            Self::Instant => (0.0, 0.0, 0.0),
        };
        LatencyConfig {
            enabled: !matches!(self, Self::Instant),
            first_unit_ms,
            per_unit_ms,
            variance,
        }
    }
}

impl std::str::FromStr for LatencyPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "standard" => Ok(Self::Standard),
            "slow" => Ok(Self::Slow),
            "instant" => Ok(Self::Instant),
            _ => Err(format!("Unknown latency preset: {}", s)),
        }
    }
}
