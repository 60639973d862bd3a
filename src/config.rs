//! Configuration for the scoring engine.
//!
//! A [`ScoringConfig`] fixes the two numbers every scoring rule is expressed in:
//! how many pins stand in a rack and how many frames a game has. The limits in
//! the frame policy tables (own-roll allowance, bonus counts, last-frame handling)
//! are all derived from these two values.
//!
//! | Preset | Pins | Frames |
//! |--------|------|--------|
//! | `ten_pin()` / `default()` | 10 | 10 |
//! | `practice(n)` | 10 | `n` |
//!
//! # Example
//!
//! ```
//! use tenpin::{ScoreGenerator, ScoringConfig};
//!
//! // A three-frame practice game
//! let generator = ScoreGenerator::with_config(ScoringConfig::practice(3)).unwrap();
//! let report = generator.generate(&[10, 10, 10, 10, 10]).unwrap();
//! assert_eq!(report.final_score(), Some(90));
//! ```

use crate::{ScoreError, MAX_FRAMES, MAX_PINS};

/// Rack size and game length used by the scoring engine.
///
/// # Forward Compatibility
///
/// New fields may be added to this struct in future versions. Use the
/// `..ScoringConfig::default()` pattern when constructing instances.
///
/// # Example
///
/// ```
/// use tenpin::ScoringConfig;
///
/// let short = ScoringConfig {
///     max_frames: 5,
///     ..ScoringConfig::default()
/// };
/// assert!(short.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "ScoringConfig has no effect unless passed to ScoreGenerator::with_config()"]
pub struct ScoringConfig {
    /// Number of pins in a full rack. A roll knocking down all of them on the
    /// first ball of a frame is a strike.
    ///
    /// Default: 10
    pub max_pins: u8,

    /// Number of frames in a game. The frame with this number is the last frame
    /// and takes its bonus rolls as its own rolls.
    ///
    /// Default: 10
    pub max_frames: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_pins: MAX_PINS,
            max_frames: MAX_FRAMES,
        }
    }
}

impl ScoringConfig {
    /// Creates a new `ScoringConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Regulation ten-pin bowling: ten pins, ten frames.
    pub fn ten_pin() -> Self {
        Self::default()
    }

    /// A shortened game with the regulation rack.
    ///
    /// Useful for drills and for exercising last-frame rules without playing
    /// through nine frames first.
    pub fn practice(frames: u8) -> Self {
        Self {
            max_frames: frames,
            ..Self::default()
        }
    }

    /// Highest score a game can reach, i.e. the score of a perfect game.
    #[must_use]
    pub const fn max_game_score(&self) -> u32 {
        // Every frame scores at most three racks: its own plus two bonus racks.
        3 * self.max_pins as u32 * self.max_frames as u32
    }

    /// Validates the configuration itself.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidConfig`] if the rack or the game is empty.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.max_pins == 0 {
            return Err(ScoreError::InvalidConfig {
                info: "max_pins must be at least 1".to_owned(),
            });
        }
        if self.max_frames == 0 {
            return Err(ScoreError::InvalidConfig {
                info: "max_frames must be at least 1".to_owned(),
            });
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

    #[test]
    fn default_is_regulation() {
        let config = ScoringConfig::default();
        assert_eq!(config.max_pins, 10);
        assert_eq!(config.max_frames, 10);
        assert_eq!(config, ScoringConfig::ten_pin());
        assert_eq!(config, ScoringConfig::new());
    }

    #[test]
    fn practice_keeps_rack() {
        let config = ScoringConfig::practice(3);
        assert_eq!(config.max_pins, 10);
        assert_eq!(config.max_frames, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn max_game_score_is_perfect_game() {
        assert_eq!(ScoringConfig::ten_pin().max_game_score(), 300);
        assert_eq!(ScoringConfig::practice(1).max_game_score(), 30);
    }

    #[test]
    fn validate_rejects_empty_rack() {
        let config = ScoringConfig {
            max_pins: 0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_game() {
        assert!(matches!(
            ScoringConfig::practice(0).validate(),
            Err(ScoreError::InvalidConfig { .. })
        ));
    }
}
