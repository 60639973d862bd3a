use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::FrameNumber;

/// This enum contains all error messages the scoring engine can return. Every scoring
/// entry point returns a [`Result<_, ScoreError>`], and the first invalid roll or frame
/// aborts the whole computation.
///
/// Frame-level failures carry an optional `roll_index`: a [`Frame`] does not know where
/// its rolls came from, so the index is attached by the [`ScoreGenerator`] when the
/// failure is propagated (see [`ScoreError::at_roll`]).
///
/// [`Result<_, ScoreError>`]: std::result::Result
/// [`Frame`]: crate::Frame
/// [`ScoreGenerator`]: crate::ScoreGenerator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoreError {
    /// A pin count outside `0..=max_pins`.
    RollOutOfRange {
        /// The rejected pin count.
        pins: i32,
        /// The largest pin count a single roll may knock down.
        max_pins: u8,
        /// Position of the roll in the input sequence, if known.
        roll_index: Option<usize>,
    },
    /// A roll was offered to a frame whose score is already final.
    FrameClosed {
        /// The frame that refused the roll.
        frame: FrameNumber,
        /// The rejected pin count.
        pins: i32,
        /// Position of the roll in the input sequence, if known.
        roll_index: Option<usize>,
    },
    /// The frame's own rolls would knock down more pins than the frame allows.
    FrameOverflow {
        /// The frame that refused the roll.
        frame: FrameNumber,
        /// The rejected pin count.
        pins: i32,
        /// Sum of the frame's own rolls before this roll.
        current_sum: u32,
        /// The largest own-roll sum the frame accepts at this point.
        max_sum: u32,
        /// Position of the roll in the input sequence, if known.
        roll_index: Option<usize>,
    },
    /// An attempt to open a frame past the configured frame count.
    TooManyFrames {
        /// The frame number that could not be opened.
        frame: FrameNumber,
        /// The configured number of frames per game.
        max_frames: u8,
    },
    /// A roll was supplied after the last frame had received all of its rolls.
    GameOverflow {
        /// Position of the surplus roll in the input sequence.
        roll_index: usize,
        /// The surplus pin count.
        pins: i32,
        /// The configured number of frames per game.
        max_frames: u8,
    },
    /// The scoring configuration is unusable.
    InvalidConfig {
        /// Further specifies why the configuration was rejected.
        info: String,
    },
}

impl ScoreError {
    /// Attaches the input position of the offending roll to a frame-level error.
    ///
    /// Errors that already know their position, and errors that are not about a
    /// single roll, are returned unchanged.
    #[must_use]
    pub fn at_roll(self, index: usize) -> Self {
        match self {
            Self::RollOutOfRange {
                pins,
                max_pins,
                roll_index: None,
            } => Self::RollOutOfRange {
                pins,
                max_pins,
                roll_index: Some(index),
            },
            Self::FrameClosed {
                frame,
                pins,
                roll_index: None,
            } => Self::FrameClosed {
                frame,
                pins,
                roll_index: Some(index),
            },
            Self::FrameOverflow {
                frame,
                pins,
                current_sum,
                max_sum,
                roll_index: None,
            } => Self::FrameOverflow {
                frame,
                pins,
                current_sum,
                max_sum,
                roll_index: Some(index),
            },
            other => other,
        }
    }

    /// Returns the input position of the offending roll, if the error has one.
    #[must_use]
    pub const fn roll_index(&self) -> Option<usize> {
        match self {
            Self::RollOutOfRange { roll_index, .. }
            | Self::FrameClosed { roll_index, .. }
            | Self::FrameOverflow { roll_index, .. } => *roll_index,
            Self::GameOverflow { roll_index, .. } => Some(*roll_index),
            Self::TooManyFrames { .. } | Self::InvalidConfig { .. } => None,
        }
    }

    /// Returns the frame the error refers to, if any.
    #[must_use]
    pub const fn frame(&self) -> Option<FrameNumber> {
        match self {
            Self::FrameClosed { frame, .. }
            | Self::FrameOverflow { frame, .. }
            | Self::TooManyFrames { frame, .. } => Some(*frame),
            Self::RollOutOfRange { .. } | Self::GameOverflow { .. } | Self::InvalidConfig { .. } => {
                None
            }
        }
    }
}

/// Formats ` at roll N` for errors whose position is known.
struct RollPosition(Option<usize>);

impl Display for RollPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, " at roll {}", index),
            None => Ok(()),
        }
    }
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::RollOutOfRange {
                pins,
                max_pins,
                roll_index,
            } => {
                write!(
                    f,
                    "Invalid pins{}: {} is outside 0..={}",
                    RollPosition(*roll_index),
                    pins,
                    max_pins
                )
            },
            ScoreError::FrameClosed {
                frame,
                pins,
                roll_index,
            } => {
                write!(
                    f,
                    "Cannot add roll {}{} to completed frame {}",
                    pins,
                    RollPosition(*roll_index),
                    frame
                )
            },
            ScoreError::FrameOverflow {
                frame,
                pins,
                current_sum,
                max_sum,
                roll_index,
            } => {
                write!(
                    f,
                    "Exceeded maximum pins for frame {}{}: {} + {} > {}",
                    frame,
                    RollPosition(*roll_index),
                    current_sum,
                    pins,
                    max_sum
                )
            },
            ScoreError::TooManyFrames { frame, max_frames } => {
                write!(
                    f,
                    "Cannot open frame {}: a game has at most {} frames",
                    frame, max_frames
                )
            },
            ScoreError::GameOverflow {
                roll_index,
                pins,
                max_frames,
            } => {
                write!(
                    f,
                    "Frames exceeded: roll {} ({} pins) comes after frame {} was finished",
                    roll_index, pins, max_frames
                )
            },
            ScoreError::InvalidConfig { info } => {
                write!(f, "Invalid scoring configuration: {}", info)
            },
        }
    }
}

impl Error for ScoreError {}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    fn frame(n: u8) -> FrameNumber {
        FrameNumber::new(n).expect("frame numbers start at 1")
    }

    #[test]
    fn at_roll_fills_missing_index() {
        let err = ScoreError::RollOutOfRange {
            pins: 11,
            max_pins: 10,
            roll_index: None,
        }
        .at_roll(4);
        assert_eq!(err.roll_index(), Some(4));
    }

    #[test]
    fn at_roll_keeps_existing_index() {
        let err = ScoreError::FrameOverflow {
            frame: frame(3),
            pins: 5,
            current_sum: 7,
            max_sum: 10,
            roll_index: Some(2),
        }
        .at_roll(9);
        assert_eq!(err.roll_index(), Some(2));
        assert_eq!(err.frame(), Some(frame(3)));
    }

    #[test]
    fn at_roll_leaves_other_kinds_alone() {
        let err = ScoreError::TooManyFrames {
            frame: frame(11),
            max_frames: 10,
        };
        assert_eq!(err.clone().at_roll(1), err);
        assert_eq!(err.roll_index(), None);
    }

    #[test]
    fn display_mentions_position_and_limits() {
        let err = ScoreError::FrameOverflow {
            frame: frame(1),
            pins: 2,
            current_sum: 9,
            max_sum: 10,
            roll_index: Some(1),
        };
        let text = err.to_string();
        assert!(text.contains("frame 1"));
        assert!(text.contains("at roll 1"));
        assert!(text.contains("9 + 2 > 10"));
    }

    #[test]
    fn display_without_position() {
        let err = ScoreError::RollOutOfRange {
            pins: -1,
            max_pins: 10,
            roll_index: None,
        };
        assert_eq!(err.to_string(), "Invalid pins: -1 is outside 0..=10");
    }

    #[test]
    fn game_overflow_always_has_position() {
        let err = ScoreError::GameOverflow {
            roll_index: 20,
            pins: 1,
            max_frames: 10,
        };
        assert_eq!(err.roll_index(), Some(20));
        assert_eq!(err.frame(), None);
        assert!(err.to_string().starts_with("Frames exceeded"));
    }
}
