//! Property-based tests for fault decisions

use proptest::prelude::*;

use llm_emulator::config::ChaosConfig;
use llm_emulator::engine::{render_fault, FaultEngine};
use llm_emulator::random::{ScriptedRandom, SeededRandom};
use llm_emulator::types::{FaultKind, FaultOutcome, Provider};

fn engine(rate_limit: f64, server_error: f64, slowdown: f64) -> FaultEngine {
    FaultEngine::new(ChaosConfig {
        enabled: true,
        rate_limit_probability: rate_limit,
        server_error_probability: server_error,
        slowdown_probability: slowdown,
        ..Default::default()
    })
}

/// Three rates summing to at most one
fn rates() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b, c)| {
        let sum = a + b + c;
        if sum > 1.0 {
            (a / sum, b / sum, c / sum)
        } else {
            (a, b, c)
        }
    })
}

proptest! {
    /// Every roll lands in exactly the band its cumulative thresholds predict
    #[test]
    fn test_outcomes_partition_the_roll((r, e, s) in rates(), roll in 0.0f64..1.0) {
        let outcome = engine(r, e, s).decide(&ScriptedRandom::constant(roll));

        let expected = if roll < r {
            FaultOutcome::Fail(FaultKind::RateLimit)
        } else if roll < r + e {
            FaultOutcome::Fail(FaultKind::ServerError)
        } else if roll < r + e + s {
            FaultOutcome::Slowdown
        } else {
            FaultOutcome::None
        };
        prop_assert_eq!(outcome, expected);
    }

    /// Disabled injection never fails, whatever the rates
    #[test]
    fn test_disabled_never_fails((r, e, s) in rates(), roll in 0.0f64..1.0) {
        let config = ChaosConfig {
            enabled: false,
            rate_limit_probability: r,
            server_error_probability: e,
            slowdown_probability: s,
            ..Default::default()
        };
        let outcome = FaultEngine::new(config).decide(&ScriptedRandom::constant(roll));
        prop_assert_eq!(outcome, FaultOutcome::None);
    }

    /// Every fault kind renders for every provider with an error status
    #[test]
    fn test_every_fault_renders(kind_idx in 0usize..4, provider_idx in 0usize..3) {
        let kind = FaultKind::ALL[kind_idx];
        let provider = [Provider::OpenAI, Provider::Anthropic, Provider::Gemini][provider_idx];
        let response = render_fault(kind, provider);

        prop_assert!(response.status.is_client_error() || response.status.is_server_error());
        prop_assert_eq!(
            response.header("retry-after").is_some(),
            kind == FaultKind::RateLimit
        );
    }
}

#[test]
fn test_empirical_rates_converge() {
    let (r, e, s) = (0.2, 0.1, 0.3);
    let engine = engine(r, e, s);
    let rng = SeededRandom::with_seed(42);
    let trials = 100_000;

    let mut counts = [0usize; 4];
    for _ in 0..trials {
        let slot = match engine.decide(&rng) {
            FaultOutcome::Fail(FaultKind::RateLimit) => 0,
            FaultOutcome::Fail(_) => 1,
            FaultOutcome::Slowdown => 2,
            FaultOutcome::None => 3,
        };
        counts[slot] += 1;
    }

    assert_eq!(counts.iter().sum::<usize>(), trials);
    for (count, expected) in counts.iter().zip([r, e, s, 1.0 - r - e - s]) {
        let observed = *count as f64 / trials as f64;
        assert!((observed - expected).abs() < 0.01, "{} vs {}", observed, expected);
    }
}
