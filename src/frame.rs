//! The per-frame scoring state machine.
//!
//! A [`Frame`] accumulates two kinds of rolls:
//!
//! - **own rolls**, knocked down in this frame (one or two, three in the last frame)
//! - **bonus rolls**, borrowed from the following frames after a strike (two) or a
//!   spare (one). The last frame never borrows; its bonus balls are own rolls.
//!
//! Frames are values. [`Frame::with_roll`] returns a new frame and leaves the old
//! one untouched, and every derived property (strike, spare, score, completion) is
//! computed from the accumulated rolls on demand.
//!
//! Two completion signals are tracked separately:
//!
//! | Signal | Meaning |
//! |--------|---------|
//! | [`Frame::rolls_completed`] | no more own rolls; the next roll opens a new frame |
//! | [`Frame::is_completed`] | the score is final; no roll of any kind is accepted |
//!
//! A non-last strike is `rolls_completed` after one roll but stays open for its two
//! bonus rolls.

use crate::telemetry::{InvariantChecker, InvariantViolation, ViolationKind};
use crate::{FrameNumber, ScoreError, ScoreResult, ScoringConfig};
use smallvec::SmallVec;

/// Own rolls of a frame: at most three, in the last frame.
pub type OwnRolls = SmallVec<[u8; 3]>;

/// Rolls borrowed from later frames: at most two, after a strike.
pub type BonusRolls = SmallVec<[u8; 2]>;

/// One frame of a game and the rolls it has seen so far.
///
/// # Example
///
/// ```
/// use tenpin::{Frame, FrameNumber, ScoringConfig};
///
/// let frame = Frame::open(FrameNumber::FIRST, 0, ScoringConfig::default())?;
/// let frame = frame.with_roll(10)?;
/// assert!(frame.is_strike());
/// assert!(frame.rolls_completed());
/// assert!(!frame.is_completed());
///
/// // The next two rolls belong to frame 2 but are also counted here.
/// let frame = frame.with_roll(4)?.with_roll(3)?;
/// assert_eq!(frame.score(), 17);
/// assert!(frame.is_completed());
/// # Ok::<(), tenpin::ScoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    number: FrameNumber,
    rules: ScoringConfig,
    prev_score: u32,
    own_rolls: OwnRolls,
    bonus_rolls: BonusRolls,
}

impl Frame {
    /// Opens an empty frame.
    ///
    /// `prev_score` is the running score of the frame before it (0 for the first).
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::TooManyFrames`] if `number` is past `rules.max_frames`.
    pub fn open(number: FrameNumber, prev_score: u32, rules: ScoringConfig) -> ScoreResult<Self> {
        if number.get() > rules.max_frames {
            return Err(ScoreError::TooManyFrames {
                frame: number,
                max_frames: rules.max_frames,
            });
        }
        Ok(Self {
            number,
            rules,
            prev_score,
            own_rolls: SmallVec::new(),
            bonus_rolls: SmallVec::new(),
        })
    }

    /// Opens the frame that follows this one, carrying this frame's score forward.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::TooManyFrames`] if this is the last frame.
    pub fn open_next(&self) -> ScoreResult<Self> {
        let number = self.number.next().ok_or(ScoreError::TooManyFrames {
            frame: self.number,
            max_frames: self.rules.max_frames,
        })?;
        Self::open(number, self.score(), self.rules)
    }

    /// Returns a new frame with `pins` added.
    ///
    /// The roll is checked in this order:
    ///
    /// 1. `pins` must be within `0..=max_pins` ([`ScoreError::RollOutOfRange`])
    /// 2. the frame must not be completed ([`ScoreError::FrameClosed`])
    /// 3. a non-last strike or spare takes the roll as a bonus roll; otherwise it
    ///    becomes an own roll and must fit under [`Frame::max_own_roll_sum`]
    ///    ([`ScoreError::FrameOverflow`])
    ///
    /// The returned errors never carry a roll index; the caller knows where the roll
    /// came from and attaches it with [`ScoreError::at_roll`].
    pub fn with_roll(&self, pins: i32) -> ScoreResult<Self> {
        let roll = u8::try_from(pins)
            .ok()
            .filter(|&roll| roll <= self.rules.max_pins)
            .ok_or(ScoreError::RollOutOfRange {
                pins,
                max_pins: self.rules.max_pins,
                roll_index: None,
            })?;

        if self.is_completed() {
            return Err(ScoreError::FrameClosed {
                frame: self.number,
                pins,
                roll_index: None,
            });
        }

        let mut next = self.clone();
        if self.takes_bonus_rolls() {
            next.bonus_rolls.push(roll);
        } else {
            let current_sum = self.own_sum();
            let max_sum = self.max_own_roll_sum();
            if current_sum + u32::from(roll) > max_sum {
                return Err(ScoreError::FrameOverflow {
                    frame: self.number,
                    pins,
                    current_sum,
                    max_sum,
                    roll_index: None,
                });
            }
            next.own_rolls.push(roll);
        }
        Ok(next)
    }

    /// In-place form of [`Frame::with_roll`]. On error the frame is unchanged.
    pub fn add_roll(&mut self, pins: i32) -> ScoreResult<()> {
        *self = self.with_roll(pins)?;
        Ok(())
    }

    /// The frame's position in the game.
    #[must_use]
    pub const fn number(&self) -> FrameNumber {
        self.number
    }

    /// The rules this frame is scored under.
    #[must_use]
    pub const fn rules(&self) -> ScoringConfig {
        self.rules
    }

    /// Rolls knocked down in this frame.
    #[must_use]
    pub fn own_rolls(&self) -> &[u8] {
        &self.own_rolls
    }

    /// Rolls borrowed from later frames.
    #[must_use]
    pub fn bonus_rolls(&self) -> &[u8] {
        &self.bonus_rolls
    }

    /// Whether this is the final frame of the game.
    #[must_use]
    pub fn is_last_frame(&self) -> bool {
        self.number.get() == self.rules.max_frames
    }

    /// The first own roll knocked down the full rack.
    #[must_use]
    pub fn is_strike(&self) -> bool {
        self.own_rolls.first() == Some(&self.rules.max_pins)
    }

    /// The first two own rolls knocked down the full rack between them.
    ///
    /// In the last frame a strike followed by a gutter ball is both a strike and a
    /// spare.
    #[must_use]
    pub fn is_spare(&self) -> bool {
        match self.own_rolls.as_slice() {
            [first, second, ..] => {
                u16::from(*first) + u16::from(*second) == u16::from(self.rules.max_pins)
            },
            _ => false,
        }
    }

    /// Running score: the previous frame's score plus every roll this frame has seen.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.prev_score + self.own_sum() + sum(&self.bonus_rolls)
    }

    /// The score can no longer change.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        let own = self.own_rolls.len();
        let bonus = self.bonus_rolls.len();
        let last = self.is_last_frame();
        if self.is_strike() {
            if last {
                own == 3
            } else {
                bonus == 2
            }
        } else if self.is_spare() {
            if last {
                own == 3
            } else {
                bonus == 1
            }
        } else {
            own == 2
        }
    }

    /// No more own rolls are accepted.
    #[must_use]
    pub fn rolls_completed(&self) -> bool {
        let own = self.own_rolls.len();
        if self.is_last_frame() && (self.is_strike() || self.is_spare()) {
            own == 3
        } else if !self.is_last_frame() && self.is_strike() {
            own == 1
        } else {
            own == 2
        }
    }

    /// Largest sum the own rolls may reach once the next own roll is added.
    ///
    /// Outside the last frame this is always one rack. In the last frame the rack
    /// is reset after a strike or spare, so the allowance grows by a rack each time
    /// the running sum reaches a multiple of it.
    #[must_use]
    pub fn max_own_roll_sum(&self) -> u32 {
        let rack = u32::from(self.rules.max_pins);
        let own = self.own_sum();
        if self.is_last_frame() && own >= 2 * rack {
            3 * rack
        } else if self.is_last_frame() && own >= rack {
            2 * rack
        } else {
            rack
        }
    }

    /// How many more bonus rolls this frame is waiting for.
    ///
    /// Always zero for the last frame and for frames that are neither strike nor
    /// spare.
    #[must_use]
    pub fn pending_bonus_rolls(&self) -> usize {
        if self.is_last_frame() {
            return 0;
        }
        let wanted = if self.is_strike() {
            2
        } else if self.is_spare() {
            1
        } else {
            0
        };
        wanted - self.bonus_rolls.len().min(wanted)
    }

    /// Freezes the frame into its wire record.
    #[must_use]
    pub fn snapshot(&self) -> FrameRecord {
        FrameRecord {
            number: self.number,
            rolls: self.own_rolls.clone(),
            strike: self.is_strike(),
            spare: self.is_spare(),
            score: self.score(),
            completed: self.is_completed(),
        }
    }

    fn takes_bonus_rolls(&self) -> bool {
        !self.is_last_frame() && (self.is_strike() || self.is_spare())
    }

    fn own_sum(&self) -> u32 {
        sum(&self.own_rolls)
    }
}

fn sum(rolls: &[u8]) -> u32 {
    rolls.iter().map(|&roll| u32::from(roll)).sum()
}

impl InvariantChecker for Frame {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let max_pins = self.rules.max_pins;
        let last = self.is_last_frame();
        let broken = |invariant: &str| {
            InvariantViolation::new(ViolationKind::FrameState, "Frame", invariant)
                .with_frame(self.number)
        };

        if self.number.get() > self.rules.max_frames {
            return Err(broken("frame number past the last frame").with_details(format!(
                "number={}, max_frames={}",
                self.number, self.rules.max_frames
            )));
        }

        if let Some(roll) = self
            .own_rolls
            .iter()
            .chain(self.bonus_rolls.iter())
            .find(|&&roll| roll > max_pins)
        {
            return Err(broken("roll larger than a rack")
                .with_details(format!("roll={}, max_pins={}", roll, max_pins)));
        }

        let own_limit = if last { 3 } else { 2 };
        if self.own_rolls.len() > own_limit {
            return Err(broken("too many own rolls")
                .with_details(format!("own_rolls={}, max={}", self.own_rolls.len(), own_limit)));
        }

        if !last && self.own_sum() > u32::from(max_pins) {
            return Err(broken("own rolls exceed one rack")
                .with_details(format!("own_sum={}, max_pins={}", self.own_sum(), max_pins)));
        }

        if !last && self.is_strike() && self.own_rolls.len() > 1 {
            return Err(broken("strike followed by an own roll outside the last frame"));
        }

        let bonus_limit = if last {
            0
        } else if self.is_strike() {
            2
        } else if self.is_spare() {
            1
        } else {
            0
        };
        if self.bonus_rolls.len() > bonus_limit {
            return Err(broken("too many bonus rolls").with_details(format!(
                "bonus_rolls={}, max={}",
                self.bonus_rolls.len(),
                bonus_limit
            )));
        }

        if self.is_completed() && !self.rolls_completed() {
            return Err(broken("score is final while own rolls are still expected"));
        }

        Ok(())
    }
}

/// An immutable snapshot of a frame, as returned in a [`ScoreReport`].
///
/// Serializes as `{number, rolls, strike, spare, score, completed}`, with `rolls`
/// holding the frame's own rolls only.
///
/// [`ScoreReport`]: crate::ScoreReport
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRecord {
    /// The frame's position in the game.
    pub number: FrameNumber,
    /// Own rolls, in order.
    pub rolls: OwnRolls,
    /// The first roll knocked down the full rack.
    pub strike: bool,
    /// The first two rolls knocked down the full rack between them.
    pub spare: bool,
    /// Cumulative score up to and including this frame.
    pub score: u32,
    /// The score will not change with further rolls.
    pub completed: bool,
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

    fn frame_number(n: u8) -> FrameNumber {
        FrameNumber::new(n).unwrap()
    }

    fn open(n: u8) -> Frame {
        Frame::open(frame_number(n), 0, ScoringConfig::default()).unwrap()
    }

    fn rolled(n: u8, rolls: &[i32]) -> Frame {
        rolls
            .iter()
            .fold(open(n), |frame, &pins| frame.with_roll(pins).unwrap())
    }

    // ==========================================
    // Opening frames
    // ==========================================

    #[test]
    fn open_rejects_frame_past_last() {
        let err = Frame::open(frame_number(11), 0, ScoringConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::TooManyFrames {
                frame: frame_number(11),
                max_frames: 10,
            }
        );
    }

    #[test]
    fn rules_travel_to_the_next_frame() {
        let rules = ScoringConfig::practice(3);
        let frame = Frame::open(FrameNumber::FIRST, 0, rules).unwrap();
        assert_eq!(frame.rules(), rules);
        assert_eq!(frame.open_next().unwrap().rules(), rules);
    }

    #[test]
    fn open_next_carries_score() {
        let first = rolled(1, &[3, 4]);
        let second = first.open_next().unwrap();
        assert_eq!(second.number(), frame_number(2));
        assert_eq!(second.score(), 7);
        assert!(second.own_rolls().is_empty());
    }

    #[test]
    fn open_next_from_last_frame_fails() {
        let last = rolled(10, &[1, 2]);
        assert!(matches!(
            last.open_next(),
            Err(ScoreError::TooManyFrames { max_frames: 10, .. })
        ));
    }

    // ==========================================
    // Roll validation
    // ==========================================

    #[test]
    fn rejects_negative_and_oversized_rolls() {
        let frame = open(1);
        assert!(matches!(
            frame.with_roll(-1),
            Err(ScoreError::RollOutOfRange { pins: -1, max_pins: 10, roll_index: None })
        ));
        assert!(matches!(
            frame.with_roll(11),
            Err(ScoreError::RollOutOfRange { pins: 11, .. })
        ));
        assert!(matches!(
            frame.with_roll(i32::MAX),
            Err(ScoreError::RollOutOfRange { .. })
        ));
    }

    #[test]
    fn range_is_checked_before_completion() {
        let closed = rolled(1, &[3, 4]);
        assert!(matches!(
            closed.with_roll(11),
            Err(ScoreError::RollOutOfRange { .. })
        ));
        assert!(matches!(
            closed.with_roll(1),
            Err(ScoreError::FrameClosed { pins: 1, .. })
        ));
    }

    #[test]
    fn overflowing_own_rolls_rejected() {
        let frame = rolled(1, &[9]);
        let err = frame.with_roll(2).unwrap_err();
        assert_eq!(
            err,
            ScoreError::FrameOverflow {
                frame: frame_number(1),
                pins: 2,
                current_sum: 9,
                max_sum: 10,
                roll_index: None,
            }
        );
    }

    #[test]
    fn with_roll_leaves_original_untouched() {
        let frame = rolled(1, &[4]);
        let next = frame.with_roll(5).unwrap();
        assert_eq!(frame.own_rolls(), &[4]);
        assert_eq!(next.own_rolls(), &[4, 5]);
    }

    #[test]
    fn add_roll_is_atomic_on_error() {
        let mut frame = rolled(1, &[6]);
        assert!(frame.add_roll(5).is_err());
        assert_eq!(frame.own_rolls(), &[6]);
        frame.add_roll(4).unwrap();
        assert!(frame.is_spare());
    }

    // ==========================================
    // Open frames, strikes, spares
    // ==========================================

    #[test]
    fn open_frame_completes_after_two_rolls() {
        let one = rolled(3, &[4]);
        assert!(!one.rolls_completed());
        assert!(!one.is_completed());

        let two = one.with_roll(2).unwrap();
        assert!(two.rolls_completed());
        assert!(two.is_completed());
        assert_eq!(two.score(), 6);
        assert_eq!(two.pending_bonus_rolls(), 0);
    }

    #[test]
    fn strike_takes_two_bonus_rolls() {
        let strike = rolled(1, &[10]);
        assert!(strike.is_strike());
        assert!(!strike.is_spare());
        assert!(strike.rolls_completed());
        assert_eq!(strike.pending_bonus_rolls(), 2);

        let one_bonus = strike.with_roll(10).unwrap();
        assert_eq!(one_bonus.bonus_rolls(), &[10]);
        assert!(one_bonus.own_rolls().len() == 1);
        assert!(!one_bonus.is_completed());
        assert_eq!(one_bonus.pending_bonus_rolls(), 1);

        let done = one_bonus.with_roll(10).unwrap();
        assert!(done.is_completed());
        assert_eq!(done.score(), 30);
        assert!(matches!(
            done.with_roll(0),
            Err(ScoreError::FrameClosed { .. })
        ));
    }

    #[test]
    fn bonus_rolls_are_not_capped_by_the_rack() {
        // 9 + 9 would overflow the next frame, but that is for the next frame to say.
        let frame = rolled(1, &[10, 9, 9]);
        assert_eq!(frame.score(), 28);
    }

    #[test]
    fn spare_takes_one_bonus_roll() {
        let spare = rolled(2, &[6, 4]);
        assert!(spare.is_spare());
        assert!(!spare.is_strike());
        assert!(spare.rolls_completed());
        assert!(!spare.is_completed());
        assert_eq!(spare.pending_bonus_rolls(), 1);

        let done = spare.with_roll(7).unwrap();
        assert!(done.is_completed());
        assert_eq!(done.score(), 17);
    }

    #[test]
    fn gutter_then_ten_is_a_spare() {
        let frame = rolled(1, &[0, 10]);
        assert!(frame.is_spare());
        assert!(!frame.is_strike());
    }

    #[test]
    fn score_includes_previous_frame() {
        let frame = Frame::open(frame_number(4), 42, ScoringConfig::default())
            .unwrap()
            .with_roll(3)
            .unwrap();
        assert_eq!(frame.score(), 45);
    }

    // ==========================================
    // Last frame
    // ==========================================

    #[test]
    fn last_frame_open_completes_after_two() {
        let frame = rolled(10, &[3, 6]);
        assert!(frame.rolls_completed());
        assert!(frame.is_completed());
        assert!(matches!(
            frame.with_roll(1),
            Err(ScoreError::FrameClosed { .. })
        ));
    }

    #[test]
    fn last_frame_three_strikes() {
        let frame = rolled(10, &[10, 10, 10]);
        assert!(frame.is_strike());
        assert!(!frame.is_spare());
        assert!(frame.rolls_completed());
        assert!(frame.is_completed());
        assert_eq!(frame.own_rolls(), &[10, 10, 10]);
        assert!(frame.bonus_rolls().is_empty());
        assert_eq!(frame.score(), 30);
    }

    #[test]
    fn last_frame_spare_keeps_flag_after_fill_ball() {
        let frame = rolled(10, &[2, 8, 6]);
        assert!(frame.is_spare());
        assert!(frame.is_completed());
        assert_eq!(frame.score(), 16);
    }

    #[test]
    fn last_frame_strike_then_gutter_is_also_a_spare() {
        let frame = rolled(10, &[10, 0]);
        assert!(frame.is_strike());
        assert!(frame.is_spare());
        assert!(!frame.rolls_completed());
        assert_eq!(frame.max_own_roll_sum(), 20);

        let done = frame.with_roll(7).unwrap();
        let record = done.snapshot();
        assert!(record.strike && record.spare);
        assert!(record.completed);
        assert_eq!(record.score, 17);
    }

    #[test]
    fn last_frame_allowance_grows_with_racks() {
        assert_eq!(open(10).max_own_roll_sum(), 10);
        assert_eq!(rolled(10, &[10]).max_own_roll_sum(), 20);
        assert_eq!(rolled(10, &[4, 6]).max_own_roll_sum(), 20);
        assert_eq!(rolled(10, &[10, 10]).max_own_roll_sum(), 30);
        // Partial second rack after a strike
        assert_eq!(rolled(10, &[10, 5]).max_own_roll_sum(), 20);
        // Non-last frames never grow
        assert_eq!(rolled(9, &[10]).max_own_roll_sum(), 10);
    }

    #[test]
    fn last_frame_strike_then_partial_rack() {
        let frame = rolled(10, &[10, 5]);
        assert!(frame.with_roll(6).is_err());
        let done = frame.with_roll(5).unwrap();
        assert!(done.is_completed());
        assert_eq!(done.score(), 20);
    }

    #[test]
    fn last_frame_never_waits_for_bonus() {
        assert_eq!(rolled(10, &[10]).pending_bonus_rolls(), 0);
        assert_eq!(rolled(10, &[5, 5]).pending_bonus_rolls(), 0);
    }

    #[test]
    fn practice_game_last_frame() {
        let rules = ScoringConfig::practice(1);
        let frame = Frame::open(FrameNumber::FIRST, 0, rules).unwrap();
        assert!(frame.is_last_frame());
        let frame = frame.with_roll(10).unwrap();
        assert!(!frame.rolls_completed());
        assert_eq!(frame.pending_bonus_rolls(), 0);
    }

    // ==========================================
    // Snapshots and invariants
    // ==========================================

    #[test]
    fn snapshot_holds_own_rolls_only() {
        let record = rolled(1, &[10, 3, 4]).snapshot();
        assert_eq!(record.number, frame_number(1));
        assert_eq!(record.rolls.as_slice(), &[10]);
        assert!(record.strike);
        assert!(!record.spare);
        assert_eq!(record.score, 17);
        assert!(record.completed);
    }

    #[test]
    fn snapshot_wire_shape() {
        let record = rolled(1, &[6, 4]).snapshot();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "number": 1,
                "rolls": [6, 4],
                "strike": false,
                "spare": true,
                "score": 10,
                "completed": false,
            })
        );
    }

    #[test]
    fn accepted_rolls_keep_invariants() {
        for rolls in [
            &[][..],
            &[10][..],
            &[10, 10, 10][..],
            &[5, 5, 5][..],
            &[0, 0][..],
        ] {
            for number in [1, 9, 10] {
                let frame = rolled(number, rolls);
                assert!(frame.check_invariants().is_ok(), "{:?}", frame);
            }
        }
    }

    #[test]
    fn invariant_detects_hand_built_overflow() {
        let mut frame = open(1);
        frame.own_rolls.extend([6, 6]);
        let violation = frame.check_invariants().unwrap_err();
        assert_eq!(violation.invariant, "own rolls exceed one rack");
        assert_eq!(violation.kind, ViolationKind::FrameState);
        assert_eq!(violation.frame, Some(frame_number(1)));
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use crate::test_config::case_count;
    use proptest::prelude::*;

    fn frame_number() -> impl Strategy<Value = FrameNumber> {
        (1..=10u8).prop_map(|n| FrameNumber::new(n).expect("non-zero"))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: whatever is thrown at a frame, it never accepts a roll that
        /// breaks its invariants and never loses score.
        #[test]
        fn prop_accepted_rolls_keep_invariants(
            number in frame_number(),
            pins in proptest::collection::vec(-2..13i32, 0..6),
        ) {
            let mut frame = Frame::open(number, 0, ScoringConfig::default()).expect("in range");
            for roll in pins {
                let before = frame.score();
                if let Ok(next) = frame.with_roll(roll) {
                    prop_assert!(next.check_invariants().is_ok());
                    prop_assert!(next.score() >= before);
                    frame = next;
                }
            }
        }

        /// Property: a rejected roll leaves the frame exactly as it was
        #[test]
        fn prop_rejection_is_pure(
            number in frame_number(),
            first in 0..=10i32,
            second in -5..20i32,
        ) {
            let frame = Frame::open(number, 0, ScoringConfig::default())
                .expect("in range")
                .with_roll(first)
                .expect("single legal roll");
            let mut copy = frame.clone();
            if copy.add_roll(second).is_err() {
                prop_assert_eq!(copy, frame);
            }
        }
    }
}
