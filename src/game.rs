//! A single game's roll history.
//!
//! [`Game`] is the ledger a collaborator (a web handler, a scoreboard) keeps for one
//! game. It never stores a roll the engine has not accepted: a candidate roll is
//! scored together with the whole history first, and only committed when that
//! succeeds.
//!
//! ```
//! use tenpin::{Game, GameId, ScoreError};
//!
//! let mut game = Game::new(GameId::new(1));
//! game.add_roll(9)?;
//!
//! // 9 + 2 pins in one frame is impossible; the history is left alone.
//! let err = game.add_roll(2).unwrap_err();
//! assert!(matches!(err, ScoreError::FrameOverflow { .. }));
//! assert_eq!(game.rolls(), &[9]);
//!
//! game.add_roll(1)?;
//! assert!(game.score().frames()[0].spare);
//! # Ok::<(), ScoreError>(())
//! ```

use crate::{ScoreGenerator, ScoreReport, ScoreResult};
use tracing::debug;

/// Identifies a game.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct GameId(u64);

impl GameId {
    /// Creates a new `GameId`.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The score of one game, as handed to a collaborator.
///
/// Serializes as `{"game": <id>, "score": [<frame record>, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GameScore {
    /// The game this score belongs to.
    pub game: GameId,
    /// Frame-by-frame score.
    pub score: ScoreReport,
}

/// An ordered, always-valid roll history.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    rolls: Vec<i32>,
    report: ScoreReport,
    generator: ScoreGenerator,
}

impl Game {
    /// An empty regulation game.
    #[must_use]
    pub fn new(id: GameId) -> Self {
        Self::empty(id, ScoreGenerator::new())
    }

    /// An empty game scored by `generator`, e.g. a short practice game.
    #[must_use]
    pub fn with_generator(id: GameId, generator: ScoreGenerator) -> Self {
        Self::empty(id, generator)
    }

    /// Rebuilds a game from a stored history.
    ///
    /// # Errors
    ///
    /// Fails with the first error in `rolls`; stored histories are validated like
    /// live ones.
    pub fn from_rolls(id: GameId, rolls: impl IntoIterator<Item = i32>) -> ScoreResult<Self> {
        let generator = ScoreGenerator::new();
        let rolls: Vec<i32> = rolls.into_iter().collect();
        let report = generator.generate(&rolls)?;
        Ok(Self {
            id,
            rolls,
            report,
            generator,
        })
    }

    fn empty(id: GameId, generator: ScoreGenerator) -> Self {
        let report = ScoreReport::new(Vec::new(), generator.config().max_frames);
        Self {
            id,
            rolls: Vec::new(),
            report,
            generator,
        }
    }

    /// The game's identifier.
    #[must_use]
    pub const fn id(&self) -> GameId {
        self.id
    }

    /// Committed rolls, oldest first.
    #[must_use]
    pub fn rolls(&self) -> &[i32] {
        &self.rolls
    }

    /// Score of the committed history.
    #[must_use]
    pub const fn score(&self) -> &ScoreReport {
        &self.report
    }

    /// Scores the history with `candidate` appended, without committing it.
    ///
    /// # Errors
    ///
    /// Returns the error [`Game::add_roll`] would refuse `candidate` with.
    pub fn preview(&self, candidate: i32) -> ScoreResult<ScoreReport> {
        let mut rolls = Vec::with_capacity(self.rolls.len() + 1);
        rolls.extend_from_slice(&self.rolls);
        rolls.push(candidate);
        self.generator.generate(&rolls)
    }

    /// Validates `candidate` against the whole history and commits it.
    ///
    /// Returns the new score.
    ///
    /// # Errors
    ///
    /// Any [`ScoreError`](crate::ScoreError) from scoring the extended history. On
    /// error nothing is committed.
    pub fn add_roll(&mut self, candidate: i32) -> ScoreResult<&ScoreReport> {
        let report = self.preview(candidate).inspect_err(|err| {
            debug!("Game {} refused roll {}: {}", self.id, candidate, err);
        })?;
        self.rolls.push(candidate);
        self.report = report;
        Ok(&self.report)
    }

    /// All frames are played and every bonus is known.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.report.is_complete()
    }

    /// The game's score record.
    #[must_use]
    pub fn summary(&self) -> GameScore {
        GameScore {
            game: self.id,
            score: self.report.clone(),
        }
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
    use crate::{ScoreError, ScoringConfig};

    #[test]
    fn new_game_is_empty() {
        let game = Game::new(GameId::new(3));
        assert_eq!(game.id().as_u64(), 3);
        assert!(game.rolls().is_empty());
        assert!(game.score().is_empty());
        assert!(!game.is_finished());
    }

    #[test]
    fn rejected_roll_is_not_committed() {
        let mut game = Game::from_rolls(GameId::new(1), [4]).unwrap();
        let err = game.add_roll(7).unwrap_err();
        assert!(matches!(err, ScoreError::FrameOverflow { roll_index: Some(1), .. }));
        assert_eq!(game.rolls(), &[4]);
        assert_eq!(game.score().running_total(), 4);
    }

    #[test]
    fn preview_does_not_commit() {
        let game = Game::from_rolls(GameId::new(1), [10]).unwrap();
        let preview = game.preview(5).unwrap();
        assert_eq!(preview.running_total(), 20);
        assert_eq!(game.rolls(), &[10]);
        assert_eq!(game.score().running_total(), 10);
    }

    #[test]
    fn add_roll_returns_new_score() {
        let mut game = Game::new(GameId::new(1));
        assert_eq!(game.add_roll(7).unwrap().running_total(), 7);
        assert_eq!(game.add_roll(3).unwrap().running_total(), 10);
        assert_eq!(game.rolls(), &[7, 3]);
    }

    #[test]
    fn finished_game_refuses_more_rolls() {
        let mut game = Game::from_rolls(GameId::new(9), vec![10; 12]).unwrap();
        assert!(game.is_finished());
        assert!(matches!(
            game.add_roll(0),
            Err(ScoreError::GameOverflow { roll_index: 12, .. })
        ));
        assert_eq!(game.rolls().len(), 12);
    }

    #[test]
    fn from_rolls_validates_history() {
        assert!(matches!(
            Game::from_rolls(GameId::new(1), [5, 6]),
            Err(ScoreError::FrameOverflow { .. })
        ));
    }

    #[test]
    fn practice_generator_is_used() {
        let generator = ScoreGenerator::with_config(ScoringConfig::practice(1)).unwrap();
        let mut game = Game::with_generator(GameId::new(2), generator);
        game.add_roll(3).unwrap();
        game.add_roll(4).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.score().final_score(), Some(7));
    }

    #[test]
    fn summary_wire_shape() {
        let game = Game::from_rolls(GameId::new(42), [3, 4]).unwrap();
        let json = serde_json::to_value(game.summary()).unwrap();
        assert_eq!(json["game"], 42);
        assert_eq!(json["score"][0]["rolls"], serde_json::json!([3, 4]));
        assert_eq!(json["score"][0]["score"], 7);
        assert_eq!(json["score"][0]["completed"], true);
    }
}
