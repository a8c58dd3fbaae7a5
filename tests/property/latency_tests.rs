//! Property-based tests for the latency model

use proptest::prelude::*;
use std::time::Duration;

use llm_emulator::config::LatencyConfig;
use llm_emulator::latency::{DelayKind, LatencyModel, MIN_FIRST_UNIT_MS, MIN_PER_UNIT_MS};
use llm_emulator::random::{ScriptedRandom, SeededRandom};

fn model(first_unit_ms: f64, per_unit_ms: f64, variance: f64) -> LatencyModel {
    LatencyModel::new(&LatencyConfig {
        enabled: true,
        first_unit_ms,
        per_unit_ms,
        variance,
    })
}

proptest! {
    /// Delays never drop below their floors
    #[test]
    fn test_delays_respect_floors(
        first in 0.0f64..2000.0,
        per in 0.0f64..500.0,
        variance in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let m = model(first, per, variance);
        let rng = SeededRandom::with_seed(seed);

        for _ in 0..50 {
            prop_assert!(m.first_unit_delay(&rng) >= Duration::from_millis(MIN_FIRST_UNIT_MS));
            prop_assert!(m.per_unit_delay(&rng) >= Duration::from_millis(MIN_PER_UNIT_MS));
        }
    }

    /// Before flooring, samples stay within base * (1 ± variance)
    #[test]
    fn test_raw_samples_within_jitter_band(
        base in 0.0f64..2000.0,
        variance in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let m = model(base, base, variance);
        let rng = SeededRandom::with_seed(seed);
        let low = (base * (1.0 - variance)).round();
        let high = (base * (1.0 + variance)).round();

        for kind in [DelayKind::FirstUnit, DelayKind::PerUnit] {
            for _ in 0..50 {
                let raw = m.sample_raw(kind, &rng);
                prop_assert!(raw >= low && raw <= high, "{} not in [{}, {}]", raw, low, high);
            }
        }
    }

    /// Zero variance gives exactly the base once above the floor
    #[test]
    fn test_zero_variance_is_exact(base in 50u64..5000, draw in 0.0f64..1.0) {
        let m = model(base as f64, base as f64, 0.0);
        let rng = ScriptedRandom::constant(draw);
        prop_assert_eq!(m.first_unit_delay(&rng), Duration::from_millis(base));
        prop_assert_eq!(m.per_unit_delay(&rng), Duration::from_millis(base));
    }

    /// Scaling multiplies both bases
    #[test]
    fn test_scaled_bases(base in 0.0f64..1000.0, multiplier in 1.0f64..10.0) {
        let m = model(base, base / 2.0, 0.1).scaled(multiplier);
        prop_assert!((m.base_ms(DelayKind::FirstUnit) - base * multiplier).abs() < 1e-6);
        prop_assert!((m.base_ms(DelayKind::PerUnit) - base / 2.0 * multiplier).abs() < 1e-6);
    }

    /// Seeded sources give identical delay sequences
    #[test]
    fn test_seeded_sequences_repeat(seed in any::<u64>()) {
        let m = model(250.0, 30.0, 0.5);
        let a = SeededRandom::with_seed(seed);
        let b = SeededRandom::with_seed(seed);

        for _ in 0..20 {
            prop_assert_eq!(m.per_unit_delay(&a), m.per_unit_delay(&b));
        }
    }
}

#[test]
fn test_disabled_model_never_waits() {
    let m = LatencyModel::disabled();
    let rng = SeededRandom::with_seed(3);
    assert_eq!(m.first_unit_delay(&rng), Duration::ZERO);
    assert_eq!(m.per_unit_delay(&rng), Duration::ZERO);
}
