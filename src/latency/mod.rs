//! Latency simulation module
//!
//! Computes the first-unit delay (time to first token) and the per-unit
//! delay (inter-token latency) from configured bases plus bounded jitter:
//! `round(base * (1 + uniform(-variance, +variance)))`, floored at
//! [`MIN_FIRST_UNIT_MS`] and [`MIN_PER_UNIT_MS`].

use std::time::Duration;

use crate::config::LatencyConfig;
use crate::random::RandomSource;

/// Floor for the first-unit delay
pub const MIN_FIRST_UNIT_MS: u64 = 50;

/// Floor for every subsequent unit delay
pub const MIN_PER_UNIT_MS: u64 = 5;

/// Which delay is being computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayKind {
    FirstUnit,
    PerUnit,
}

/// Latency model for a single request
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyModel {
    enabled: bool,
    first_unit_ms: f64,
    per_unit_ms: f64,
    variance: f64,
}

impl LatencyModel {
    pub fn new(config: &LatencyConfig) -> Self {
        Self {
            enabled: config.enabled,
            first_unit_ms: config.first_unit_ms,
            per_unit_ms: config.per_unit_ms,
            variance: config.variance.clamp(0.0, 1.0),
        }
    }

    /// A model that never waits
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            first_unit_ms: 0.0,
            per_unit_ms: 0.0,
            variance: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn base_ms(&self, kind: DelayKind) -> f64 {
        match kind {
            DelayKind::FirstUnit => self.first_unit_ms,
            DelayKind::PerUnit => self.per_unit_ms,
        }
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Multiply both bases, used for slowdown outcomes
    pub fn scaled(&self, multiplier: f64) -> Self {
        let multiplier = if multiplier.is_finite() && multiplier > 0.0 {
            multiplier
        } else {
            1.0
        };
        Self {
            first_unit_ms: self.first_unit_ms * multiplier,
            per_unit_ms: self.per_unit_ms * multiplier,
            ..self.clone()
        }
    }

    /// Jittered delay in milliseconds before flooring
    pub fn sample_raw(&self, kind: DelayKind, rng: &dyn RandomSource) -> f64 {
        let base = self.base_ms(kind);
        let jitter = rng.uniform(-self.variance, self.variance);
        (base * (1.0 + jitter)).round()
    }

    fn sample(&self, kind: DelayKind, rng: &dyn RandomSource) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let floor = match kind {
            DelayKind::FirstUnit => MIN_FIRST_UNIT_MS,
            DelayKind::PerUnit => MIN_PER_UNIT_MS,
        };
        let raw = self.sample_raw(kind, rng).max(0.0) as u64;
        Duration::from_millis(raw.max(floor))
    }

    /// Delay before the first unit is delivered
    pub fn first_unit_delay(&self, rng: &dyn RandomSource) -> Duration {
        self.sample(DelayKind::FirstUnit, rng)
    }

    /// Delay before each subsequent unit
    pub fn per_unit_delay(&self, rng: &dyn RandomSource) -> Duration {
        self.sample(DelayKind::PerUnit, rng)
    }
}

impl Default for LatencyModel {
    fn default() -> Self {
        Self::new(&LatencyConfig::default())
    }
}
