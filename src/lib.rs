//! # tenpin
//!
//! A validated, frame-by-frame ten-pin bowling scoring engine.
//!
//! Feed it the ordered pin counts of one game, finished or still in progress, and it
//! returns one record per frame: the frame's own rolls, whether it was a strike or a
//! spare, the running score and whether that score can still change. Impossible
//! sequences (eleven pins, two rolls adding up to more than a rack, a roll after the
//! game is over) are rejected with a [`ScoreError`] naming the offending roll.
//!
//! ```
//! use tenpin::generate;
//!
//! let report = generate(&[10, 7, 3, 9, 0])?;
//! let scores: Vec<u32> = report.iter().map(|frame| frame.score).collect();
//! assert_eq!(scores, vec![20, 39, 48]);
//! assert!(report.frames()[0].strike);
//! assert!(report.frames()[1].spare);
//! # Ok::<(), tenpin::ScoreError>(())
//! ```
//!
//! The engine is pure: it owns no state between calls, so a caller that stores rolls
//! (see [`Game`]) simply rescores the whole history, validating a candidate roll
//! before committing it.
//!
//! ## Crate layout
//!
//! - [`Frame`] is the per-frame state machine. Every roll produces a new frame.
//! - [`ScoreGenerator`] folds a roll sequence into frames and resolves strike and
//!   spare bonuses by looking ahead in the input.
//! - [`ScoreReport`] is the ordered list of [`FrameRecord`] snapshots it returns.
//! - [`Game`] keeps one game's roll history and refuses rolls that would break it.
//! - [`telemetry`] reports internal invariant violations through `tracing` or a
//!   custom observer.
//!
//! ## Feature flags
//!
//! - `sync-send`: requires violation observers to be `Send + Sync`
//! - `paranoid`: runs per-frame invariant checks in release builds

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub use checksum::ChecksumError;
pub use config::ScoringConfig;
pub use error::ScoreError;
pub use frame::{Frame, FrameRecord};
pub use game::{Game, GameId, GameScore};
pub use generator::{generate, ScoreGenerator};
pub use report::ScoreReport;

pub mod checksum;
pub mod config;
#[doc(hidden)]
pub mod error;
pub mod frame;
pub mod game;
pub mod generator;
pub mod prelude;
pub mod report;
pub mod telemetry;
pub mod test_config;

/// Internal types exposed for property tests and benchmarks.
///
/// **This module is not part of the stable public API.** Its contents may
/// change without notice.
#[doc(hidden)]
pub mod __internal {
    pub use crate::generator::BonusLookahead;
}

// #############
// # CONSTANTS #
// #############

/// Pins in a full rack. Knocking all of them down with the first roll of a frame is
/// a strike.
pub const MAX_PINS: u8 = 10;

/// Frames in a regulation game. The last frame takes its bonus rolls as its own.
pub const MAX_FRAMES: u8 = 10;

/// A specialized `Result` type for scoring operations.
pub type ScoreResult<T> = Result<T, ScoreError>;

/// The 1-based position of a frame within a game.
///
/// Frame numbers are never zero. The upper bound depends on the
/// [`ScoringConfig`] in use and is checked when a frame is opened.
///
/// ```
/// use tenpin::FrameNumber;
///
/// let first = FrameNumber::FIRST;
/// assert_eq!(first.get(), 1);
/// assert_eq!(first.next().map(FrameNumber::get), Some(2));
/// assert!(FrameNumber::new(0).is_none());
/// assert_eq!(FrameNumber::new(10).unwrap().to_string(), "10");
/// ```
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct FrameNumber(u8);

impl FrameNumber {
    /// The opening frame of every game.
    pub const FIRST: Self = Self(1);

    /// Creates a frame number, or `None` for zero.
    #[inline]
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number == 0 {
            None
        } else {
            Some(Self(number))
        }
    }

    /// Returns the underlying number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the following frame number, or `None` if it does not fit in a `u8`.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Zero-based position of this frame in a report.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u8> for FrameNumber {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number).ok_or_else(|| "frame numbers start at 1".to_owned())
    }
}

impl From<FrameNumber> for u8 {
    fn from(number: FrameNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
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

    #[test]
    fn frame_number_rejects_zero() {
        assert_eq!(FrameNumber::new(0), None);
        assert_eq!(FrameNumber::try_from(0), Err("frame numbers start at 1".to_owned()));
    }

    #[test]
    fn frame_number_next_saturates_at_u8() {
        assert_eq!(FrameNumber::new(u8::MAX).unwrap().next(), None);
        assert_eq!(FrameNumber::FIRST.next(), FrameNumber::new(2));
    }

    #[test]
    fn frame_number_index_is_zero_based() {
        assert_eq!(FrameNumber::FIRST.index(), 0);
        assert_eq!(FrameNumber::new(10).unwrap().index(), 9);
    }

    #[test]
    fn frame_number_ordering() {
        let third = FrameNumber::new(3).unwrap();
        assert!(FrameNumber::FIRST < third);
        assert_eq!(u8::from(third), 3);
    }

    #[test]
    fn frame_number_serde_is_bare_integer() {
        let json = serde_json::to_string(&FrameNumber::new(4).unwrap()).unwrap();
        assert_eq!(json, "4");
        let back: FrameNumber = serde_json::from_str("4").unwrap();
        assert_eq!(back.get(), 4);
        assert!(serde_json::from_str::<FrameNumber>("0").is_err());
    }

    #[test]
    fn constants_match_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.max_pins, MAX_PINS);
        assert_eq!(config.max_frames, MAX_FRAMES);
    }
}
