//! Game recording, replay and snapshots.
//!
//! Because rock placement is seeded and every rule is deterministic, a
//! recording only needs:
//! - the options, with the seed the game actually used
//! - the roster, in join order
//! - the accepted actions, in order
//!
//! No grid deltas are stored. To view move N, re-run the game from the
//! start up to N.
//!
//! # Time Travel
//!
//! - **Forward**: apply the next recorded action
//! - **Backward**: re-run from move 0 to (`position` - 1)
//! - **Jump to move N**: re-run from move 0 to N

mod render;

pub use render::{render_ascii, render_plain};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GameOptions;
use crate::error::ReplayError;
use crate::game::{Game, MoveAction, MoveRecord, Player, check_invariants};

/// Current recording file format version.
pub const RECORDING_VERSION: u32 = 1;

/// Everything needed to re-simulate a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// File format version.
    pub version: u32,
    /// Options with the seed pinned.
    pub options: GameOptions,
    /// Roster in join order, with scores reset.
    pub players: Vec<Player>,
    /// Accepted actions, oldest first.
    pub moves: Vec<MoveRecord>,
    /// When the recording was made.
    pub recorded_at: DateTime<Utc>,
}

impl Recording {
    /// Capture a started game.
    ///
    /// Returns `None` if the game has not chosen a seed yet.
    #[must_use]
    pub fn from_game(game: &Game) -> Option<Self> {
        let seed = game.seed()?;
        let players = game
            .players()
            .iter()
            .map(|p| Player::new(p.id, p.name.clone(), p.color.clone()))
            .collect();

        Some(Self {
            version: RECORDING_VERSION,
            options: GameOptions {
                seed: Some(seed),
                ..*game.options()
            },
            players,
            moves: game.history().to_vec(),
            recorded_at: Utc::now(),
        })
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether no actions were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Build the game as it was right after starting.
    ///
    /// # Errors
    ///
    /// Returns an error if the options or roster are rejected.
    pub fn initial_game(&self) -> Result<Game, ReplayError> {
        let mut game = Game::new(self.options)?;
        for player in &self.players {
            game.add_player(player.clone())?;
        }
        game.start()?;
        Ok(game)
    }

    /// Apply recorded action `index` to `game`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is past the end or the engine rejects
    /// the action.
    pub fn apply(&self, game: &mut Game, index: usize) -> Result<(), ReplayError> {
        let record = self.moves.get(index).ok_or(ReplayError::PastEnd {
            requested: index + 1,
            len: self.moves.len(),
        })?;
        let result = match record.action {
            MoveAction::Place(pos) => game.apply_move(record.player, pos).map(drop),
            MoveAction::Pass => game.pass_turn(record.player).map(drop),
        };
        result.map_err(|error| ReplayError::InvalidMove { index, error })
    }

    /// Re-simulate every recorded action.
    ///
    /// # Errors
    ///
    /// Returns the first action the engine rejects.
    pub fn replay(&self) -> Result<Game, ReplayError> {
        let mut game = self.initial_game()?;
        for index in 0..self.moves.len() {
            self.apply(&mut game, index)?;
        }
        Ok(game)
    }

    /// Save the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a recording saved by [`Recording::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail or the format is invalid.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        let recording = serde_json::from_reader(BufReader::new(file))?;
        Ok(recording)
    }
}

/// Save a full game snapshot as JSON.
///
/// # Errors
///
/// Returns an error if file operations fail.
pub fn save_snapshot(game: &Game, path: &Path) -> Result<(), ReplayError> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), game)?;
    Ok(())
}

/// Load a snapshot saved by [`save_snapshot`].
///
/// # Errors
///
/// Returns an error if file operations fail, the format is invalid, or the
/// loaded game breaks its invariants.
pub fn load_snapshot(path: &Path) -> Result<Game, ReplayError> {
    let file = File::open(path)?;
    let game: Game = serde_json::from_reader(BufReader::new(file))?;

    let violations = check_invariants(&game);
    if !violations.is_empty() {
        return Err(ReplayError::InvalidSnapshot {
            violations: violations.into_iter().map(|v| v.message).collect(),
        });
    }
    Ok(game)
}

/// Replay engine - steps through a recording deterministically.
///
/// Since games are deterministic, this engine can:
/// - Step forward by applying one action
/// - Step backward by replaying from move 0
/// - Jump to any move by replaying from move 0
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    game: Game,
    position: usize,
}

impl ReplayEngine {
    /// Create a replay engine positioned before the first action.
    ///
    /// # Errors
    ///
    /// Returns an error if the game cannot be set up.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_move(recording, 0)
    }

    /// Create a replay engine positioned after `target` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is past the end or a recorded action is
    /// rejected.
    pub fn new_at_move(recording: Recording, target: usize) -> Result<Self, ReplayError> {
        if target > recording.len() {
            return Err(ReplayError::PastEnd {
                requested: target,
                len: recording.len(),
            });
        }
        let mut game = recording.initial_game()?;
        for index in 0..target {
            recording.apply(&mut game, index)?;
        }
        Ok(Self {
            recording,
            game,
            position: target,
        })
    }

    /// The recording being replayed.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Number of actions applied so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Game state at the current position.
    #[must_use]
    pub const fn state(&self) -> &Game {
        &self.game
    }

    /// Whether every recorded action has been applied.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.recording.len()
    }

    /// Whether the game at the current position is decided.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game.win_condition().is_some_and(|w| w.is_decided())
    }

    /// The action that will be applied next.
    #[must_use]
    pub fn next_move(&self) -> Option<&MoveRecord> {
        self.recording.moves.get(self.position)
    }

    /// Apply the next action.
    ///
    /// # Errors
    ///
    /// Returns an error at the end of the recording.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        self.recording.apply(&mut self.game, self.position)?;
        self.position += 1;
        Ok(())
    }

    /// Undo the last action by replaying from the start.
    ///
    /// Stepping back from move 0 stays at move 0.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorded action is rejected.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        self.goto_move(self.position.saturating_sub(1))
    }

    /// Jump to the state after `target` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is past the end or a recorded action is
    /// rejected.
    pub fn goto_move(&mut self, target: usize) -> Result<(), ReplayError> {
        if target >= self.position && target <= self.recording.len() {
            while self.position < target {
                self.step_forward()?;
            }
            return Ok(());
        }
        let recording = self.recording.clone();
        *self = Self::new_at_move(recording, target)?;
        Ok(())
    }

    /// Render current state to ASCII for terminal viewing.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(&self.game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameStatus, Position};
    use crate::playout::{RandomMover, default_roster, start_game};
    use tempfile::NamedTempFile;

    fn options() -> GameOptions {
        GameOptions {
            width: 8,
            height: 8,
            ..GameOptions::default()
        }
    }

    fn played_game(seed: u64) -> Game {
        let mut game = start_game(seed, &options(), default_roster(3)).unwrap();
        let mut mover = RandomMover::new(seed);
        for _ in 0..12 {
            mover.step(&mut game);
        }
        game.pass_turn(game.current_turn().unwrap().player_id).ok();
        game
    }

    #[test]
    fn test_recording_requires_seed() {
        let game = Game::new(GameOptions::default()).unwrap();
        assert!(Recording::from_game(&game).is_none());
    }

    #[test]
    fn test_recording_replays_to_same_state() {
        let game = played_game(11);
        let recording = Recording::from_game(&game).unwrap();
        assert_eq!(recording.len(), game.history().len());
        assert_eq!(recording.options.seed, Some(11));

        let replayed = recording.replay().unwrap();
        assert_eq!(replayed.grid(), game.grid());
        assert_eq!(replayed.history(), game.history());
        assert_eq!(replayed.players(), game.players());
    }

    #[test]
    fn test_recording_save_load_roundtrip() {
        let recording = Recording::from_game(&played_game(4)).unwrap();
        let temp_file = NamedTempFile::new().expect("create temp file");
        recording.save(temp_file.path()).expect("save recording");

        let loaded = Recording::load(temp_file.path()).expect("load recording");
        assert_eq!(loaded, recording);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not json").unwrap();
        assert!(matches!(
            Recording::load(temp_file.path()),
            Err(ReplayError::Json(_))
        ));
    }

    #[test]
    fn test_tampered_recording_reports_index() {
        let mut recording = Recording::from_game(&played_game(9)).unwrap();
        let first = match recording.moves[0].action {
            MoveAction::Place(pos) => pos,
            MoveAction::Pass => Position::new(0, 0),
        };
        recording.moves[1].action = MoveAction::Place(first);

        let err = recording.replay().unwrap_err();
        assert!(matches!(err, ReplayError::InvalidMove { index: 1, .. }));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let game = played_game(21);
        let temp_file = NamedTempFile::new().unwrap();
        save_snapshot(&game, temp_file.path()).unwrap();
        assert_eq!(load_snapshot(temp_file.path()).unwrap(), game);
    }

    #[test]
    fn test_snapshot_with_short_grid_rejected() {
        let game = played_game(21);
        let mut json = serde_json::to_value(&game).unwrap();
        json["grid"]["cells"].as_array_mut().unwrap().truncate(3);
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), json.to_string()).unwrap();

        let err = load_snapshot(temp_file.path()).unwrap_err();
        assert!(matches!(err, ReplayError::Json(_)));
        assert!(err.to_string().contains("holds 3 cells"));
    }

    #[test]
    fn test_inconsistent_snapshot_rejected() {
        let game = played_game(21);
        let mut json = serde_json::to_value(&game).unwrap();
        json["players"][0]["score"] = serde_json::json!(999);
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), json.to_string()).unwrap();

        let err = load_snapshot(temp_file.path()).unwrap_err();
        let ReplayError::InvalidSnapshot { violations } = err else {
            panic!("expected an invalid snapshot, got {err}");
        };
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("cached score 999"));
    }

    #[test]
    fn test_engine_time_travel() {
        let recording = Recording::from_game(&played_game(5)).unwrap();
        let mut engine = ReplayEngine::new(recording.clone()).unwrap();
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.state().move_count(), 0);
        assert_eq!(engine.state().status(), GameStatus::Running);

        engine.step_forward().unwrap();
        engine.step_forward().unwrap();
        let after_two = engine.state().clone();

        engine.goto_move(6).unwrap();
        assert_eq!(engine.state().move_count(), 6);

        engine.goto_move(2).unwrap();
        assert_eq!(engine.state().grid(), after_two.grid());

        engine.step_backward().unwrap();
        assert_eq!(engine.position(), 1);

        engine.goto_move(recording.len()).unwrap();
        assert!(engine.at_end());
        assert!(matches!(
            engine.step_forward(),
            Err(ReplayError::PastEnd { .. })
        ));
        assert!(engine.goto_move(recording.len() + 1).is_err());
    }

    #[test]
    fn test_step_backward_at_start_stays() {
        let recording = Recording::from_game(&played_game(6)).unwrap();
        let mut engine = ReplayEngine::new(recording).unwrap();
        engine.step_backward().unwrap();
        assert_eq!(engine.position(), 0);
    }
}
