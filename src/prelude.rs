//! Convenient re-exports for common usage.
//!
//! ```rust
//! use tenpin::prelude::*;
//!
//! let mut game = Game::new(GameId::new(7));
//! game.add_roll(10)?;
//! game.add_roll(3)?;
//! assert_eq!(game.score().running_total(), 16);
//! # Ok::<(), ScoreError>(())
//! ```

// Scoring engine
pub use crate::{generate, ScoreGenerator, ScoringConfig};

// Frames and reports
pub use crate::{Frame, FrameNumber, FrameRecord, ScoreReport};

// Game ledger
pub use crate::{Game, GameId, GameScore};

// Error handling
pub use crate::{ScoreError, ScoreResult};

// Constants
pub use crate::{MAX_FRAMES, MAX_PINS};
