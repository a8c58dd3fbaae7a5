//! Integration test module
//!
//! Contains end-to-end tests for all API endpoints.

pub mod common;
pub mod openai_tests;
pub mod anthropic_tests;
pub mod google_tests;
