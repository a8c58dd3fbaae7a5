//! Property-based tests using proptest
//!
//! Tests statistical properties and invariants of the system.

pub mod fault_tests;
pub mod latency_tests;
pub mod persona_tests;
pub mod segmenter_tests;
