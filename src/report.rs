//! The ordered frame-by-frame result of scoring a roll sequence.

use crate::checksum::{compute_checksum, ChecksumError};
use crate::telemetry::{InvariantChecker, InvariantViolation, ViolationKind};
use crate::{FrameNumber, FrameRecord};

/// Frame snapshots in frame order, one per frame that has seen a roll.
///
/// Serializes as a bare JSON array of [`FrameRecord`]s.
///
/// ```
/// let report = tenpin::generate(&[10, 10, 10])?;
/// assert_eq!(report.len(), 3);
/// assert_eq!(report.frames()[0].score, 30);
/// assert!(report.frames()[0].completed);
/// assert_eq!(report.running_total(), 60);
/// assert_eq!(report.final_score(), None);
/// # Ok::<(), tenpin::ScoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ScoreReport {
    frames: Vec<FrameRecord>,
    #[serde(skip)]
    max_frames: u8,
}

impl ScoreReport {
    pub(crate) fn new(frames: Vec<FrameRecord>, max_frames: u8) -> Self {
        Self { frames, max_frames }
    }

    /// All frame records, first frame first.
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Number of frames that have seen at least one roll.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// No roll has been scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterates over the frame records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FrameRecord> {
        self.frames.iter()
    }

    /// The record for frame `number`, if that frame has been reached.
    #[must_use]
    pub fn get(&self, number: FrameNumber) -> Option<&FrameRecord> {
        self.frames.get(number.index())
    }

    /// The most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }

    /// Score so far, counting bonuses that are still pending as zero.
    #[must_use]
    pub fn running_total(&self) -> u32 {
        self.last().map_or(0, |frame| frame.score)
    }

    /// Every frame has been played and every bonus is known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.frames.len() == usize::from(self.max_frames)
            && self.frames.iter().all(|frame| frame.completed)
    }

    /// The final score of a complete game.
    #[must_use]
    pub fn final_score(&self) -> Option<u32> {
        self.is_complete().then(|| self.running_total())
    }

    /// Number of frames in the game this report belongs to.
    #[must_use]
    pub const fn max_frames(&self) -> u8 {
        self.max_frames
    }

    /// Deterministic fingerprint of the frame records.
    ///
    /// Equal reports always have equal checksums, across runs and platforms.
    pub fn checksum(&self) -> Result<u128, ChecksumError> {
        compute_checksum(&self.frames)
    }
}

impl<'a> IntoIterator for &'a ScoreReport {
    type Item = &'a FrameRecord;
    type IntoIter = std::slice::Iter<'a, FrameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl InvariantChecker for ScoreReport {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.frames.len() > usize::from(self.max_frames) {
            return Err(InvariantViolation::new(
                ViolationKind::FrameSequence,
                "ScoreReport",
                "more frames than the game allows",
            )
            .with_details(format!(
                "frames={}, max_frames={}",
                self.frames.len(),
                self.max_frames
            )));
        }

        for (position, frame) in self.frames.iter().enumerate() {
            if frame.number.index() != position {
                return Err(InvariantViolation::new(
                    ViolationKind::FrameSequence,
                    "ScoreReport",
                    "frame numbers are not consecutive from 1",
                )
                .with_frame(frame.number)
                .with_details(format!("position={}, number={}", position, frame.number)));
            }
        }

        for pair in self.frames.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            if later.score < earlier.score {
                return Err(InvariantViolation::new(
                    ViolationKind::Scoring,
                    "ScoreReport",
                    "score decreased",
                )
                .with_frame(later.number)
                .with_details(format!(
                    "frame {}={}, frame {}={}",
                    earlier.number, earlier.score, later.number, later.score
                )));
            }
            if later.completed && !earlier.completed {
                return Err(InvariantViolation::new(
                    ViolationKind::Scoring,
                    "ScoreReport",
                    "completed frame follows an incomplete one",
                )
                .with_frame(later.number));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::generate;

    fn frame(n: u8) -> FrameNumber {
        FrameNumber::new(n).unwrap()
    }

    #[test]
    fn queries_on_partial_game() {
        let report = generate(&[1, 4, 4, 5, 6]).unwrap();
        assert_eq!(report.len(), 3);
        assert!(!report.is_empty());
        assert_eq!(report.get(frame(2)).map(|f| f.score), Some(14));
        assert!(report.get(frame(4)).is_none());
        assert_eq!(report.last().map(|f| f.number), Some(frame(3)));
        assert_eq!(report.running_total(), 20);
        assert!(!report.is_complete());
        assert_eq!(report.final_score(), None);
        assert_eq!(report.max_frames(), 10);
    }

    #[test]
    fn complete_game_has_final_score() {
        let report = generate(&[0; 20]).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.final_score(), Some(0));
    }

    #[test]
    fn ten_frames_with_pending_bonus_is_not_complete() {
        let mut rolls = vec![0; 18];
        rolls.extend([10, 10]);
        let report = generate(&rolls).unwrap();
        assert_eq!(report.len(), 10);
        assert!(!report.is_complete());
    }

    #[test]
    fn iterates_by_reference() {
        let report = generate(&[2, 3, 4, 5]).unwrap();
        let numbers: Vec<u8> = (&report).into_iter().map(|f| f.number.get()).collect();
        assert_eq!(numbers, vec![1, 2]);
        let mut seen = 0;
        for record in &report {
            seen += record.rolls.len();
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn serializes_as_bare_list() {
        let report = generate(&[10]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "number": 1,
                "rolls": [10],
                "strike": true,
                "spare": false,
                "score": 10,
                "completed": false,
            }])
        );
    }

    #[test]
    fn generated_reports_hold_invariants() {
        for rolls in [&[][..], &[10; 12][..], &[5; 21][..], &[3, 4, 10, 2][..]] {
            assert!(generate(rolls).unwrap().check_invariants().is_ok());
        }
    }

    #[test]
    fn invariants_catch_decreasing_score() {
        let mut report = generate(&[3, 4, 5, 1]).unwrap();
        report.frames[1].score = 2;
        let violation = report.check_invariants().unwrap_err();
        assert_eq!(violation.invariant, "score decreased");
        assert_eq!(violation.kind, ViolationKind::Scoring);
        assert_eq!(violation.frame, Some(frame(2)));
    }

    #[test]
    fn invariants_catch_gap_in_numbers() {
        let mut report = generate(&[3, 4, 5, 1]).unwrap();
        report.frames[1].number = frame(3);
        let violation = report.check_invariants().unwrap_err();
        assert_eq!(violation.invariant, "frame numbers are not consecutive from 1");
        assert_eq!(violation.kind, ViolationKind::FrameSequence);
    }

    #[test]
    fn invariants_catch_completion_out_of_order() {
        let mut report = generate(&[10, 3, 4]).unwrap();
        report.frames[0].completed = false;
        let violation = report.check_invariants().unwrap_err();
        assert_eq!(violation.invariant, "completed frame follows an incomplete one");
        assert_eq!(violation.kind, ViolationKind::Scoring);
    }
}
