//! Sequencing rolls into frames.
//!
//! [`ScoreGenerator::generate`] is a fold over the roll sequence. The accumulator
//! holds the snapshots emitted so far and the frame currently being filled. Each
//! step:
//!
//! 1. rejects the roll if the last frame already has all of its own rolls
//! 2. opens the next frame if the current one takes no more own rolls
//! 3. feeds the roll to the current frame
//! 4. if that made a strike or spare outside the last frame, borrows the bonus
//!    rolls from the rolls that follow in the input, as far as they exist
//! 5. emits a snapshot once the frame has all its own rolls, or when the input
//!    runs out
//!
//! The first error aborts the whole run; no partial report is returned.

use crate::report::ScoreReport;
use crate::telemetry::{InvariantChecker, ViolationObserver};
use crate::{
    debug_check_invariants, report_violation_to, Frame, FrameNumber, FrameRecord, ScoreError,
    ScoreResult, ScoringConfig,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of borrowing bonus rolls from the rest of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusLookahead {
    /// The frame needed no bonus rolls, or found all of them.
    Resolved,
    /// The input ended before the frame's bonus was known.
    Pending {
        /// Bonus rolls still missing.
        missing: usize,
    },
}

impl BonusLookahead {
    /// Borrows up to [`Frame::pending_bonus_rolls`] rolls from `upcoming`.
    ///
    /// `first_index` is the input position of `upcoming[0]`, used to locate an
    /// invalid bonus roll in the returned error. A short `upcoming` slice is not an
    /// error: the frame is returned with its bonus left pending.
    pub fn resolve(
        frame: Frame,
        upcoming: &[i32],
        first_index: usize,
    ) -> ScoreResult<(Frame, Self)> {
        let wanted = frame.pending_bonus_rolls();
        let frame = upcoming.iter().take(wanted).enumerate().try_fold(
            frame,
            |frame, (offset, &pins)| {
                frame
                    .with_roll(pins)
                    .map_err(|e| e.at_roll(first_index + offset))
            },
        )?;

        let lookahead = match frame.pending_bonus_rolls() {
            0 => Self::Resolved,
            missing => Self::Pending { missing },
        };
        Ok((frame, lookahead))
    }
}

/// Fold state: snapshots so far plus the frame being filled.
struct Tally {
    frames: Vec<FrameRecord>,
    current: Frame,
}

/// Turns a roll sequence into a [`ScoreReport`].
///
/// The generator is stateless between calls; one instance can score any number of
/// games.
///
/// # Example
///
/// ```
/// use tenpin::ScoreGenerator;
///
/// let generator = ScoreGenerator::new();
/// let report = generator.generate(&[10; 12])?;
/// assert_eq!(report.final_score(), Some(300));
///
/// let partial = generator.generate(&[10, 10])?;
/// assert_eq!(partial.len(), 2);
/// assert!(!partial.is_complete());
/// # Ok::<(), tenpin::ScoreError>(())
/// ```
#[derive(Clone, Default)]
pub struct ScoreGenerator {
    config: ScoringConfig,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for ScoreGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreGenerator")
            .field("config", &self.config)
            .field("violation_observer", &self.violation_observer.is_some())
            .finish()
    }
}

impl ScoreGenerator {
    /// A generator for regulation ten-pin games.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator for a custom rack and game length.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(config: ScoringConfig) -> ScoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            violation_observer: None,
        })
    }

    /// Sends internal invariant violations to `observer` instead of the default
    /// tracing output.
    #[must_use = "builder methods return a new generator"]
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// The rules this generator scores with.
    #[must_use]
    pub const fn config(&self) -> ScoringConfig {
        self.config
    }

    /// The configured violation observer, if any.
    #[must_use]
    pub fn violation_observer(&self) -> Option<&Arc<dyn ViolationObserver>> {
        self.violation_observer.as_ref()
    }

    /// Scores `rolls`, a complete game or any prefix of one.
    ///
    /// An empty slice yields an empty report.
    ///
    /// # Errors
    ///
    /// The first invalid roll aborts scoring:
    ///
    /// - [`ScoreError::RollOutOfRange`] for a pin count outside `0..=max_pins`
    /// - [`ScoreError::FrameOverflow`] when a frame's own rolls exceed its allowance
    /// - [`ScoreError::GameOverflow`] for a roll after the last frame is filled
    ///
    /// Every roll-level error carries the index of the offending roll.
    pub fn generate(&self, rolls: &[i32]) -> ScoreResult<ScoreReport> {
        let first = Frame::open(FrameNumber::FIRST, 0, self.config)?;
        let tally = Tally {
            frames: Vec::with_capacity(usize::from(self.config.max_frames)),
            current: first,
        };

        let tally = rolls
            .iter()
            .enumerate()
            .try_fold(tally, |tally, (index, &pins)| {
                self.step(tally, rolls, index, pins)
            })
            .inspect_err(|err| {
                debug!("Rejected roll sequence of {} rolls: {}", rolls.len(), err);
            })?;

        let report = ScoreReport::new(tally.frames, self.config.max_frames);
        trace!(
            "Scored {} rolls into {} frames (total {})",
            rolls.len(),
            report.len(),
            report.running_total()
        );
        self.verify_report(&report, rolls.len());
        Ok(report)
    }

    fn step(&self, tally: Tally, rolls: &[i32], index: usize, pins: i32) -> ScoreResult<Tally> {
        let Tally {
            mut frames,
            current,
        } = tally;

        if current.is_last_frame() && current.rolls_completed() {
            return Err(ScoreError::GameOverflow {
                roll_index: index,
                pins,
                max_frames: self.config.max_frames,
            });
        }

        let current = if current.rolls_completed() {
            let next = current.open_next()?;
            trace!("Opened frame {} at roll {}", next.number(), index);
            next
        } else {
            current
        };

        let fed = current.with_roll(pins).map_err(|e| e.at_roll(index))?;
        let upcoming = rolls.get(index + 1..).unwrap_or(&[]);
        let (frame, lookahead) = BonusLookahead::resolve(fed, upcoming, index + 1)?;
        if let BonusLookahead::Pending { missing } = lookahead {
            trace!(
                "Frame {} waiting for {} more bonus rolls",
                frame.number(),
                missing
            );
        }
        debug_check_invariants!(
            &self.violation_observer,
            frame,
            format!("after roll {}", index)
        );

        let is_final_roll = index + 1 == rolls.len();
        if frame.rolls_completed() || is_final_roll {
            frames.push(frame.snapshot());
        }

        Ok(Tally {
            frames,
            current: frame,
        })
    }

    fn verify_report(&self, report: &ScoreReport, roll_count: usize) {
        if let Err(violation) = report.check_invariants() {
            report_violation_to!(&self.violation_observer, violation, "rolls" => roll_count);
        }
    }
}

/// Scores `rolls` under regulation rules.
///
/// Shorthand for `ScoreGenerator::new().generate(rolls)`.
///
/// ```
/// let report = tenpin::generate(&[1, 4, 4, 5])?;
/// assert_eq!(report.running_total(), 14);
/// # Ok::<(), tenpin::ScoreError>(())
/// ```
pub fn generate(rolls: &[i32]) -> ScoreResult<ScoreReport> {
    ScoreGenerator::new().generate(rolls)
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
    use crate::telemetry::CollectingObserver;

    fn scores(report: &ScoreReport) -> Vec<u32> {
        report.iter().map(|frame| frame.score).collect()
    }

    // ==========================================
    // Bonus lookahead
    // ==========================================

    #[test]
    fn lookahead_resolves_strike() {
        let frame = Frame::open(FrameNumber::FIRST, 0, ScoringConfig::default())
            .unwrap()
            .with_roll(10)
            .unwrap();
        let (frame, lookahead) = BonusLookahead::resolve(frame, &[3, 4, 9], 1).unwrap();
        assert_eq!(lookahead, BonusLookahead::Resolved);
        assert_eq!(frame.bonus_rolls(), &[3, 4]);
    }

    #[test]
    fn lookahead_leaves_missing_bonus_pending() {
        let frame = Frame::open(FrameNumber::FIRST, 0, ScoringConfig::default())
            .unwrap()
            .with_roll(10)
            .unwrap();
        let (frame, lookahead) = BonusLookahead::resolve(frame, &[7], 1).unwrap();
        assert_eq!(lookahead, BonusLookahead::Pending { missing: 1 });
        assert_eq!(frame.score(), 17);
    }

    #[test]
    fn lookahead_reports_bad_bonus_position() {
        let frame = Frame::open(FrameNumber::FIRST, 0, ScoringConfig::default())
            .unwrap()
            .with_roll(10)
            .unwrap();
        let err = BonusLookahead::resolve(frame, &[3, 12], 1).unwrap_err();
        assert_eq!(err.roll_index(), Some(2));
    }

    #[test]
    fn lookahead_skips_open_frames() {
        let frame = Frame::open(FrameNumber::FIRST, 0, ScoringConfig::default())
            .unwrap()
            .with_roll(4)
            .unwrap();
        let (same, lookahead) = BonusLookahead::resolve(frame.clone(), &[5, 5], 1).unwrap();
        assert_eq!(lookahead, BonusLookahead::Resolved);
        assert_eq!(same, frame);
    }

    // ==========================================
    // Generation
    // ==========================================

    #[test]
    fn empty_input_empty_report() {
        let report = generate(&[]).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.running_total(), 0);
    }

    #[test]
    fn open_frame_in_progress_is_emitted() {
        let report = generate(&[3, 4, 5]).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.frames()[1].rolls.as_slice(), &[5]);
        assert!(!report.frames()[1].completed);
        assert_eq!(scores(&report), vec![7, 12]);
    }

    #[test]
    fn two_strikes() {
        let report = generate(&[10, 10]).unwrap();
        assert_eq!(scores(&report), vec![20, 30]);
        assert!(report.iter().all(|frame| frame.strike && !frame.completed));
    }

    #[test]
    fn spare_bonus_taken_from_next_frame() {
        let report = generate(&[6, 4, 3, 2]).unwrap();
        assert_eq!(scores(&report), vec![13, 18]);
        assert!(report.frames()[0].completed);
    }

    #[test]
    fn overflow_carries_roll_index() {
        let err = generate(&[3, 4, 9, 2]).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::FrameOverflow {
                current_sum: 9,
                roll_index: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn bonus_overflow_is_caught_by_the_next_frame() {
        // The strike happily borrows 9 and 9, frame 2 refuses the second 9.
        let err = generate(&[10, 9, 9]).unwrap_err();
        assert_eq!(err.roll_index(), Some(2));
        assert_eq!(err.frame(), FrameNumber::new(2));
    }

    #[test]
    fn roll_after_last_frame_is_game_overflow() {
        let mut rolls = vec![0; 20];
        rolls.push(1);
        let err = generate(&rolls).unwrap_err();
        assert_eq!(
            err,
            ScoreError::GameOverflow {
                roll_index: 20,
                pins: 1,
                max_frames: 10,
            }
        );
    }

    #[test]
    fn practice_config_limits_frames() {
        let generator = ScoreGenerator::with_config(ScoringConfig::practice(2)).unwrap();
        assert_eq!(generator.config(), ScoringConfig::practice(2));
        let report = generator.generate(&[10, 10, 10, 10]).unwrap();
        assert_eq!(report.final_score(), Some(60));
        assert!(matches!(
            generator.generate(&[10, 10, 10, 10, 10]),
            Err(ScoreError::GameOverflow { roll_index: 4, .. })
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(matches!(
            ScoreGenerator::with_config(ScoringConfig::practice(0)),
            Err(ScoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn observer_sees_no_violations_on_valid_games() {
        let observer = Arc::new(CollectingObserver::new());
        let generator = ScoreGenerator::new().with_violation_observer(observer.clone());
        assert!(generator.violation_observer().is_some());
        generator.generate(&[10; 12]).unwrap();
        generator.generate(&[1, 9, 2, 8, 3]).unwrap();
        assert!(observer.is_empty());
    }

    #[test]
    fn broken_report_is_reported_under_its_own_kind() {
        use crate::telemetry::ViolationKind;

        let observer = Arc::new(CollectingObserver::new());
        let generator = ScoreGenerator::new().with_violation_observer(observer.clone());

        let mut frames = generator.generate(&[3, 4, 5, 1]).unwrap().frames().to_vec();
        frames[1].score = 2;
        generator.verify_report(&ScoreReport::new(frames, 10), 4);

        let violations = observer.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Scoring);
        assert_eq!(violations[0].frame, FrameNumber::new(2));
        assert_eq!(violations[0].context["rolls"], "4");

        let mut frames = generator.generate(&[3, 4, 5, 1]).unwrap().frames().to_vec();
        frames.remove(0);
        generator.verify_report(&ScoreReport::new(frames, 10), 2);
        assert!(observer.has_violation(ViolationKind::FrameSequence));
    }

    #[test]
    fn debug_output_hides_observer() {
        let text = format!("{:?}", ScoreGenerator::new());
        assert!(text.contains("violation_observer: false"));
    }
}
