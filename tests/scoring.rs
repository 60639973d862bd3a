//! End-to-end scoring of hand-scored games, finished and in progress, and of
//! sequences that must be rejected.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

#[path = "common/mod.rs"]
mod common;

use common::fixtures::{assert_frames, delasport, flatten, Expected, ALL_SPARES, DELASPORT_FRAMES};
use tenpin::{generate, FrameNumber, ScoreError, ScoreGenerator, ScoringConfig};

// ============================================================================
// Complete games
// ============================================================================

#[test]
fn delasport_game() {
    let report = generate(&delasport()).unwrap();
    assert_frames(&report, &DELASPORT_FRAMES);
    assert!(report.is_complete());
    assert_eq!(report.final_score(), Some(133));
}

#[test]
fn perfect_game() {
    let report = generate(&[10; 12]).unwrap();
    let mut expected: Vec<Expected> = (1..=9).map(|n| Expected::strike(30 * n)).collect();
    expected.push(Expected {
        rolls: &[10, 10, 10],
        strike: true,
        spare: false,
        score: 300,
        completed: true,
    });
    assert_frames(&report, &expected);
    assert_eq!(report.final_score(), Some(300));
}

#[test]
fn all_spares_game() {
    let report = generate(&ALL_SPARES).unwrap();
    assert_frames(
        &report,
        &[
            Expected::spare(&[1, 9], 12),
            Expected::spare(&[2, 8], 25),
            Expected::spare(&[3, 7], 39),
            Expected::spare(&[4, 6], 54),
            Expected::spare(&[5, 5], 70),
            Expected::spare(&[6, 4], 87),
            Expected::spare(&[7, 3], 105),
            Expected::spare(&[8, 2], 124),
            Expected::spare(&[9, 1], 135),
            Expected::spare(&[1, 9, 1], 146),
        ],
    );
}

#[test]
fn gutter_game() {
    let report = generate(&[0; 20]).unwrap();
    assert_eq!(report.len(), 10);
    assert!(report.iter().all(|frame| frame.score == 0 && frame.completed));
    assert_eq!(report.final_score(), Some(0));
}

#[test]
fn strike_then_partial_rack_in_last_frame() {
    let mut rolls = vec![0; 18];
    rolls.extend([10, 5, 5]);
    let report = generate(&rolls).unwrap();
    let last = report.last().unwrap();
    assert_eq!(last.rolls.as_slice(), &[10, 5, 5]);
    assert!(last.strike);
    assert!(!last.spare);
    assert_eq!(report.final_score(), Some(20));
}

#[test]
fn strike_then_gutter_in_last_frame_is_strike_and_spare() {
    let mut rolls = vec![0; 18];
    rolls.extend([10, 0]);
    let report = generate(&rolls).unwrap();
    let last = report.last().unwrap();
    assert!(last.strike && last.spare);
    assert!(!last.completed);

    rolls.push(7);
    let report = generate(&rolls).unwrap();
    let last = report.last().unwrap();
    assert_eq!(last.rolls.as_slice(), &[10, 0, 7]);
    assert!(last.strike && last.spare);
    assert_eq!(report.final_score(), Some(17));
}

#[test]
fn spare_then_strike_in_last_frame() {
    let mut rolls = vec![0; 18];
    rolls.extend([3, 7, 10]);
    let report = generate(&rolls).unwrap();
    assert_eq!(report.last().unwrap().rolls.as_slice(), &[3, 7, 10]);
    assert_eq!(report.final_score(), Some(20));
}

// ============================================================================
// Games in progress
// ============================================================================

#[test]
fn delasport_without_last_roll() {
    let mut rolls = delasport();
    rolls.pop();
    let report = generate(&rolls).unwrap();

    let mut expected = DELASPORT_FRAMES;
    expected[9] = Expected::spare(&[2, 8], 127).pending();
    assert_frames(&report, &expected);
    assert!(!report.is_complete());
    assert_eq!(report.final_score(), None);
}

#[test]
fn one_strike() {
    let report = generate(&[10]).unwrap();
    assert_frames(&report, &[Expected::strike(10).pending()]);
}

#[test]
fn two_strikes() {
    let report = generate(&[10, 10]).unwrap();
    assert_frames(
        &report,
        &[Expected::strike(20).pending(), Expected::strike(30).pending()],
    );
}

#[test]
fn three_strikes() {
    let report = generate(&[10, 10, 10]).unwrap();
    assert_frames(
        &report,
        &[
            Expected::strike(30),
            Expected::strike(50).pending(),
            Expected::strike(60).pending(),
        ],
    );
}

#[test]
fn first_roll_of_a_frame() {
    let report = generate(&[3, 4, 8]).unwrap();
    assert_frames(
        &report,
        &[Expected::open(&[3, 4], 7), Expected::open(&[8], 15).pending()],
    );
}

#[test]
fn spare_waiting_for_bonus() {
    let report = generate(&[3, 7]).unwrap();
    assert_frames(&report, &[Expected::spare(&[3, 7], 10).pending()]);
}

#[test]
fn every_prefix_of_delasport_scores() {
    let rolls = delasport();
    for cut in 0..=rolls.len() {
        let report = generate(&rolls[..cut]).unwrap();
        assert!(report.len() <= 10);
        assert!(report.iter().zip(report.iter().skip(1)).all(|(a, b)| a.score <= b.score));
    }
}

// ============================================================================
// Rejected sequences
// ============================================================================

#[test]
fn roll_too_large() {
    assert_eq!(
        generate(&[11]).unwrap_err(),
        ScoreError::RollOutOfRange {
            pins: 11,
            max_pins: 10,
            roll_index: Some(0),
        }
    );
}

#[test]
fn negative_roll() {
    assert!(matches!(
        generate(&[3, -1]),
        Err(ScoreError::RollOutOfRange {
            pins: -1,
            roll_index: Some(1),
            ..
        })
    ));
}

#[test]
fn too_many_pins_in_a_frame() {
    assert_eq!(
        generate(&[9, 2]).unwrap_err(),
        ScoreError::FrameOverflow {
            frame: FrameNumber::FIRST,
            pins: 2,
            current_sum: 9,
            max_sum: 10,
            roll_index: Some(1),
        }
    );
}

#[test]
fn too_many_pins_in_last_frame() {
    let rolls = flatten(&[
        &[1, 4],
        &[4, 5],
        &[6, 4],
        &[5, 5],
        &[10],
        &[0, 1],
        &[7, 3],
        &[6, 4],
        &[10],
        &[9, 9],
    ]);
    let err = generate(&rolls).unwrap_err();
    assert!(matches!(err, ScoreError::FrameOverflow { .. }));
    assert_eq!(err.frame(), FrameNumber::new(10));
    assert_eq!(err.roll_index(), Some(rolls.len() - 1));
}

#[test]
fn strike_then_overfull_rack_in_last_frame() {
    let mut rolls = vec![0; 18];
    rolls.extend([10, 5, 6]);
    let err = generate(&rolls).unwrap_err();
    assert!(matches!(
        err,
        ScoreError::FrameOverflow {
            current_sum: 15,
            max_sum: 20,
            roll_index: Some(20),
            ..
        }
    ));
}

#[test]
fn too_many_frames() {
    let mut rolls: Vec<i32> = [1, 0].repeat(10);
    rolls.push(1);
    assert_eq!(
        generate(&rolls).unwrap_err(),
        ScoreError::GameOverflow {
            roll_index: 20,
            pins: 1,
            max_frames: 10,
        }
    );
}

#[test]
fn thirteen_strikes() {
    assert!(matches!(
        generate(&[10; 13]),
        Err(ScoreError::GameOverflow { roll_index: 12, .. })
    ));
}

#[test]
fn extra_roll_after_spare_and_fill_ball() {
    let mut rolls = vec![5; 20];
    rolls.extend([10, 1]);
    assert!(matches!(
        generate(&rolls),
        Err(ScoreError::GameOverflow { roll_index: 21, .. })
    ));
}

#[test]
fn errors_abort_the_whole_report() {
    // A valid opening does not produce a partial result once a later roll fails.
    let rolls = [10, 10, 3, 4, 12];
    assert!(generate(&rolls).is_err());
}

#[test]
fn error_messages_name_the_problem() {
    assert!(generate(&[11]).unwrap_err().to_string().contains("Invalid pins"));
    assert!(generate(&[9, 2])
        .unwrap_err()
        .to_string()
        .contains("Exceeded maximum pins"));
    assert!(generate(&[10; 13])
        .unwrap_err()
        .to_string()
        .contains("Frames exceeded"));
}

// ============================================================================
// Custom rules
// ============================================================================

#[test]
fn five_pin_rack() {
    let config = ScoringConfig {
        max_pins: 5,
        ..ScoringConfig::default()
    };
    let generator = ScoreGenerator::with_config(config).unwrap();
    let report = generator.generate(&[5; 12]).unwrap();
    assert_eq!(report.final_score(), Some(150));
    assert!(matches!(
        generator.generate(&[6]),
        Err(ScoreError::RollOutOfRange { max_pins: 5, .. })
    ));
}

#[test]
fn three_frame_practice() {
    let generator = ScoreGenerator::with_config(ScoringConfig::practice(3)).unwrap();
    let report = generator.generate(&[3, 7, 10, 2, 8, 4]).unwrap();
    let scores: Vec<u32> = report.iter().map(|frame| frame.score).collect();
    assert_eq!(scores, vec![20, 40, 54]);
    assert!(report.is_complete());
}
