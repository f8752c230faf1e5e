//! Unit tests module
//!
//! Contains unit tests for individual functions and components.

mod cache;
mod matching;
mod params;
mod path_normalization_tests;
// resolve tests are in tests/resolve_tests.rs (separate compilation unit)
