//! Property-based tests over random legal games.
//!
//! # Properties Tested
//!
//! - Complete games have exactly ten frames and match an index-based scorer
//! - Scoring a prefix never changes a frame the prefix has already completed
//! - Any roll after a complete game is refused with `GameOverflow`
//! - An out-of-range roll is reported at its own position
//! - A frame whose own rolls exceed the rack is reported at the overflowing roll

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::games::{complete_game, game_and_cut, legal_game, reference_scores};
use proptest::prelude::*;
use tenpin::test_config::{case_count, prefix_case_count};
use tenpin::{generate, ScoreError};

// ==========================================
// Generators and reference scorer
// ==========================================

#[test]
fn legal_game_of_zeros_is_gutter_game() {
    assert_eq!(legal_game(&[]), vec![0; 20]);
}

#[test]
fn legal_game_of_tens_is_perfect() {
    assert_eq!(legal_game(&[10; 21]), vec![10; 12]);
}

#[test]
fn reference_scores_perfect_game() {
    assert_eq!(reference_scores(&[10; 12]).last(), Some(&300));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: case_count(),
        ..ProptestConfig::default()
    })]

    /// Complete games: ten completed frames with the reference cumulative scores
    #[test]
    fn prop_complete_game_matches_reference(game in complete_game()) {
        let report = generate(&game).expect("legal game");
        prop_assert_eq!(report.len(), 10);
        prop_assert!(report.is_complete());

        let scores: Vec<i32> = report.iter().map(|frame| frame.score as i32).collect();
        prop_assert_eq!(scores, reference_scores(&game));
        prop_assert!(report.final_score().expect("complete") <= 300);
    }

    /// Frame records hold exactly the frame's own rolls, in input order
    #[test]
    fn prop_own_rolls_concatenate_to_input(game in complete_game()) {
        let report = generate(&game).expect("legal game");
        let replayed: Vec<i32> = report
            .iter()
            .flat_map(|frame| frame.rolls.iter().map(|&pins| i32::from(pins)))
            .collect();
        prop_assert_eq!(replayed, game);
    }

    /// Scores never decrease and never grow by more than three racks per frame
    #[test]
    fn prop_scores_step_within_bounds((game, cut) in game_and_cut()) {
        let report = generate(&game[..cut]).expect("legal prefix");
        let mut previous = 0;
        for frame in &report {
            prop_assert!(frame.score >= previous);
            prop_assert!(frame.score - previous <= 30);
            previous = frame.score;
        }
    }

    /// One more roll after a finished game is always refused at its position
    #[test]
    fn prop_roll_after_complete_game_overflows(game in complete_game(), extra in 0..=10i32) {
        let mut rolls = game.clone();
        rolls.push(extra);
        let err = generate(&rolls).expect_err("game is over");
        prop_assert_eq!(
            err,
            ScoreError::GameOverflow { roll_index: game.len(), pins: extra, max_frames: 10 }
        );
    }

    /// A bad pin count inside an unfinished game is blamed on its own index
    #[test]
    fn prop_out_of_range_roll_located(
        (game, cut) in game_and_cut(),
        bad in prop_oneof![-50..0i32, 11..50i32],
        at in any::<prop::sample::Index>(),
    ) {
        prop_assume!(cut < game.len());
        let mut rolls = game[..cut].to_vec();
        let position = at.index(cut + 1);
        rolls.insert(position, bad);

        let err = generate(&rolls).expect_err("bad roll");
        let is_out_of_range = matches!(err, ScoreError::RollOutOfRange { .. });
        prop_assert!(is_out_of_range);
        prop_assert_eq!(err.roll_index(), Some(position));
    }

    /// Knocking down more pins than stand is caught on the overflowing roll
    #[test]
    fn prop_overfull_frame_located((game, cut) in game_and_cut(), extra in 0..10i32) {
        // Replace the second roll of a non-last frame with one more than is standing.
        let report = generate(&game).expect("legal game");
        let mut candidates = Vec::new();
        let mut start = 0;
        for frame in report.iter().take(9) {
            let first = i32::from(frame.rolls[0]);
            if frame.rolls.len() == 2 && first > 0 {
                let pins = 11 - first + extra % first;
                candidates.push((start + 1, pins));
            }
            start += frame.rolls.len();
        }
        prop_assume!(!candidates.is_empty());
        let (index, pins) = candidates
            .iter()
            .copied()
            .find(|&(index, _)| index >= cut)
            .unwrap_or(candidates[0]);

        let mut rolls = game[..index].to_vec();
        rolls.push(pins);
        let err = generate(&rolls).expect_err("overfull frame");
        let is_overflow = matches!(err, ScoreError::FrameOverflow { .. });
        prop_assert!(is_overflow);
        prop_assert_eq!(err.roll_index(), Some(index));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: prefix_case_count(),
        ..ProptestConfig::default()
    })]

    /// Completed frames in any prefix are final: the full game reports them
    /// unchanged
    #[test]
    fn prop_completed_frames_are_stable(game in complete_game()) {
        let full = generate(&game).expect("legal game");
        for cut in 0..=game.len() {
            let partial = generate(&game[..cut]).expect("legal prefix");
            prop_assert!(partial.len() <= full.len());
            for (prefix_frame, full_frame) in partial.iter().zip(full.iter()) {
                prop_assert_eq!(prefix_frame.number, full_frame.number);
                if prefix_frame.completed {
                    prop_assert_eq!(prefix_frame, full_frame);
                } else {
                    prop_assert!(prefix_frame.score <= full_frame.score);
                }
            }
        }
    }
}
