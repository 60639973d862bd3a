//! Scoring is a pure function of the roll sequence.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::delasport;
use crate::common::games::complete_game;
use proptest::prelude::*;
use tenpin::test_config::case_count;
use tenpin::{generate, ScoreGenerator};

#[test]
fn repeated_runs_are_byte_identical() {
    let rolls = delasport();
    let first = serde_json::to_string(&generate(&rolls).unwrap()).unwrap();
    for _ in 0..10 {
        let again = serde_json::to_string(&generate(&rolls).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn errors_are_reproducible() {
    let rolls = [10, 10, 9, 9];
    assert_eq!(generate(&rolls).unwrap_err(), generate(&rolls).unwrap_err());
}

#[test]
fn checksum_is_stable_across_generators() {
    let rolls = delasport();
    let a = ScoreGenerator::new().generate(&rolls).unwrap();
    let b = ScoreGenerator::default().generate(&rolls).unwrap();
    assert_eq!(a.checksum().unwrap(), b.checksum().unwrap());
}

#[test]
fn generator_is_reusable_across_games() {
    let generator = ScoreGenerator::new();
    let before = generator.generate(&[10; 12]).unwrap();
    generator.generate(&[11]).unwrap_err();
    generator.generate(&delasport()).unwrap();
    assert_eq!(generator.generate(&[10; 12]).unwrap(), before);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: case_count(),
        ..ProptestConfig::default()
    })]

    /// Two runs over the same prefix agree on every frame and on the fingerprint
    #[test]
    fn prop_same_prefix_same_report(game in complete_game(), cut in 0usize..22) {
        let prefix = &game[..cut.min(game.len())];
        let a = generate(prefix).expect("legal prefix");
        let b = generate(prefix).expect("legal prefix");
        prop_assert_eq!(a.checksum().expect("encodes"), b.checksum().expect("encodes"));
        prop_assert_eq!(a, b);
    }
}
