//! Verification integration tests.
//!
//! - Determinism tests: identical input gives byte-identical output
//! - Invariant tests: internal invariants hold for every accepted sequence
//! - Property tests: random legal games checked against an independent scorer

// Shared test infrastructure
#[path = "common/mod.rs"]
mod common;

// Verification test modules
mod verification {
    pub mod determinism;
    pub mod invariants;
    pub mod property;
}
