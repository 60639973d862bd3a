//! Hand-scored games.

#![allow(dead_code)]

use tenpin::{FrameRecord, ScoreReport};

/// Expected contents of one frame record.
#[derive(Debug, Clone, Copy)]
pub struct Expected {
    pub rolls: &'static [u8],
    pub strike: bool,
    pub spare: bool,
    pub score: u32,
    pub completed: bool,
}

impl Expected {
    pub const fn open(rolls: &'static [u8], score: u32) -> Self {
        Self {
            rolls,
            strike: false,
            spare: false,
            score,
            completed: true,
        }
    }

    pub const fn strike(score: u32) -> Self {
        Self {
            rolls: &[10],
            strike: true,
            spare: false,
            score,
            completed: true,
        }
    }

    pub const fn spare(rolls: &'static [u8], score: u32) -> Self {
        Self {
            rolls,
            strike: false,
            spare: true,
            score,
            completed: true,
        }
    }

    /// Marks the frame as still waiting for rolls.
    pub const fn pending(self) -> Self {
        Self {
            completed: false,
            ..self
        }
    }

    fn matches(&self, record: &FrameRecord) -> bool {
        record.rolls.as_slice() == self.rolls
            && record.strike == self.strike
            && record.spare == self.spare
            && record.score == self.score
            && record.completed == self.completed
    }
}

/// Flattens per-frame rolls into the input sequence.
pub fn flatten(frames: &[&[i32]]) -> Vec<i32> {
    frames.iter().flat_map(|frame| frame.iter().copied()).collect()
}

/// Asserts that `report` holds exactly `expected`, numbered from 1.
#[track_caller]
pub fn assert_frames(report: &ScoreReport, expected: &[Expected]) {
    assert_eq!(
        report.len(),
        expected.len(),
        "frame count differs: {:#?}",
        report.frames()
    );
    for (position, (record, want)) in report.iter().zip(expected).enumerate() {
        assert_eq!(
            usize::from(record.number.get()),
            position + 1,
            "frame {} is misnumbered",
            position + 1
        );
        assert!(
            want.matches(record),
            "frame {}: expected {:?}, got {:?}",
            position + 1,
            want,
            record
        );
    }
}

/// A complete game with strikes and spares in every position but the last.
pub fn delasport() -> Vec<i32> {
    flatten(&[
        &[1, 4],
        &[4, 5],
        &[6, 4],
        &[5, 5],
        &[10],
        &[0, 1],
        &[7, 3],
        &[6, 4],
        &[10],
        &[2, 8, 6],
    ])
}

pub const DELASPORT_FRAMES: [Expected; 10] = [
    Expected::open(&[1, 4], 5),
    Expected::open(&[4, 5], 14),
    Expected::spare(&[6, 4], 29),
    Expected::spare(&[5, 5], 49),
    Expected::strike(60),
    Expected::open(&[0, 1], 61),
    Expected::spare(&[7, 3], 77),
    Expected::spare(&[6, 4], 97),
    Expected::strike(117),
    Expected::spare(&[2, 8, 6], 133),
];

/// Twenty-one rolls of alternating spares ending with a spare in frame 10.
pub const ALL_SPARES: [i32; 21] = [1, 9, 2, 8, 3, 7, 4, 6, 5, 5, 6, 4, 7, 3, 8, 2, 9, 1, 1, 9, 1];
