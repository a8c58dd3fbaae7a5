//! Fault injection decision

use crate::config::ChaosConfig;
use crate::random::RandomSource;
use crate::types::{FaultKind, FaultOutcome};

/// Decides one fault outcome per request
#[derive(Debug, Clone)]
pub struct FaultEngine {
    config: ChaosConfig,
}

impl FaultEngine {
    pub fn new(config: ChaosConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    /// Check if fault injection is enabled
    pub fn is_active(&self) -> bool {
        self.config.enabled
    }

    /// Latency multiplier applied on `Slowdown`
    pub fn slowdown_multiplier(&self) -> f64 {
        self.config.slowdown_multiplier
    }

    /// Draw once and map the draw onto cumulative bands: rate-limit,
    /// then server-error, then slowdown. Anything past the bands is `None`.
    /// No draw is taken when fault injection is disabled.
    pub fn decide(&self, rng: &dyn RandomSource) -> FaultOutcome {
        if !self.config.enabled {
            return FaultOutcome::None;
        }

        let roll = rng.next_f64();
        let mut threshold = 0.0;

        threshold += self.config.rate_limit_probability;
        if roll < threshold {
            return FaultOutcome::Fail(FaultKind::RateLimit);
        }

        threshold += self.config.server_error_probability;
        if roll < threshold {
            return FaultOutcome::Fail(FaultKind::ServerError);
        }

        threshold += self.config.slowdown_probability;
        if roll < threshold {
            return FaultOutcome::Slowdown;
        }

        FaultOutcome::None
    }
}

impl Default for FaultEngine {
    fn default() -> Self {
        Self::new(ChaosConfig::default())
    }
}
