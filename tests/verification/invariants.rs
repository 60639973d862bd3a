//! Frame and report invariants hold for every sequence the engine accepts.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::games::game_and_cut;
use proptest::prelude::*;
use std::sync::Arc;
use tenpin::telemetry::{CollectingObserver, InvariantChecker};
use tenpin::test_config::case_count;
use tenpin::{assert_no_violations, Frame, FrameNumber, ScoreGenerator, ScoringConfig};

#[test]
fn every_frame_state_of_a_perfect_game_is_valid() {
    let rules = ScoringConfig::default();
    let mut frame = Frame::open(FrameNumber::FIRST, 0, rules).unwrap();
    for _ in 0..12 {
        if frame.rolls_completed() {
            frame = frame.open_next().unwrap();
        }
        frame = frame.with_roll(10).unwrap();
        assert!(frame.check_invariants().is_ok(), "{:?}", frame);
    }
    assert!(frame.is_last_frame());
    assert!(frame.is_completed());
    assert_eq!(frame.score(), 120);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: case_count(),
        ..ProptestConfig::default()
    })]

    /// Reports of legal prefixes never trip the report invariants
    #[test]
    fn prop_prefix_reports_are_valid((game, cut) in game_and_cut()) {
        let observer = Arc::new(CollectingObserver::new());
        let generator = ScoreGenerator::new().with_violation_observer(observer.clone());
        let report = generator.generate(&game[..cut]).expect("legal prefix");

        prop_assert!(report.check_invariants().is_ok());
        assert_no_violations!(observer);
    }

    /// At most the last emitted frame is still taking own rolls, and all frames
    /// before the first incomplete one are complete
    #[test]
    fn prop_completion_is_a_prefix((game, cut) in game_and_cut()) {
        let report = tenpin::generate(&game[..cut]).expect("legal prefix");
        let first_open = report.iter().position(|frame| !frame.completed);
        if let Some(position) = first_open {
            prop_assert!(report.iter().skip(position).all(|frame| !frame.completed));
            // Only strikes and spares can wait on more than one frame's rolls.
            prop_assert!(report.len() - position <= 3);
        }
    }
}
