//! Common test infrastructure shared across integration tests.
//!
//! - `fixtures`: hand-scored games with their expected frame records
//! - `games`: a legal-game builder, proptest strategies, and a reference scorer
//!
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::fixtures::{assert_frames, Expected};
//! ```

pub mod fixtures;
pub mod games;
