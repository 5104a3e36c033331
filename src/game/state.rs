//! The game aggregate: owns the grid, roster, turn and status.
//!
//! All mutation goes through [`Game::apply_move`], [`Game::pass_turn`] and
//! the lifecycle methods. Readers get shared references or value clones.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameOptions;
use crate::error::{GameError, MoveError};
use crate::game::{
    Cell, GameEvent, Grid, Player, PlayerId, Position, Region, ScoreLine, Turn, WinCondition,
    advance_turn, capture_regions, evaluate, evaluate_counts, place_rocks, project_scores,
    tile_counts, validate_move,
};

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 8;

/// Minimum number of players needed to start.
pub const MIN_PLAYERS: usize = 2;

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for players.
    Pending,
    /// Setting up the board.
    Starting,
    /// Accepting moves.
    Running,
    /// Temporarily halted.
    Paused,
    /// Final evaluation in progress.
    Ending,
    /// Finished.
    Ended,
}

impl GameStatus {
    /// Whether moving from `self` to `to` is allowed.
    ///
    /// Status only moves forward, except pause/resume and restart (any
    /// status back to `Pending`).
    #[must_use]
    pub const fn can_transition_to(self, to: GameStatus) -> bool {
        use GameStatus::{Ended, Ending, Paused, Pending, Running, Starting};
        matches!(
            (self, to),
            (_, Pending)
                | (Pending, Starting)
                | (Starting | Paused, Running)
                | (Running, Paused)
                | (Running | Paused, Ending)
                | (Ending, Ended)
        )
    }
}

/// What a recorded action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveAction {
    /// Placed a cell.
    Place(Position),
    /// Passed the turn.
    Pass,
}

/// One accepted action in the game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Move sequence number, starting at 1.
    pub seq: u32,
    /// Round the action happened in.
    pub turn_number: u32,
    /// Acting player.
    pub player: PlayerId,
    /// What the player did.
    pub action: MoveAction,
    /// Ids of regions captured by the action.
    pub regions: Vec<u32>,
}

/// Result of an accepted placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Where the cell was placed.
    pub position: Position,
    /// Who placed it.
    pub player: PlayerId,
    /// Regions captured by the placement.
    pub regions: Vec<Region>,
    /// Every cell converted by those regions.
    pub captured: Vec<Position>,
    /// Win condition after the move.
    pub win_condition: WinCondition,
    /// Notifications for collaborators.
    pub events: Vec<GameEvent>,
    /// Grid after the move.
    pub grid: Grid,
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    options: GameOptions,
    grid: Grid,
    players: Vec<Player>,
    current_turn: Option<Turn>,
    status: GameStatus,
    win_condition: Option<WinCondition>,
    seed: Option<u64>,
    move_seq: u32,
    next_region_id: u32,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Create a pending game.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are out of range.
    pub fn new(options: GameOptions) -> Result<Self, GameError> {
        options.validate()?;
        let grid = Grid::new(options.width, options.height)
            .ok_or_else(|| GameError::InvalidOptions("grid must not be empty".to_string()))?;

        Ok(Self {
            options,
            grid,
            players: Vec::new(),
            current_turn: None,
            status: GameStatus::Pending,
            win_condition: None,
            seed: options.seed,
            move_seq: 0,
            next_region_id: 1,
            history: Vec::new(),
        })
    }

    /// Options the game was created with.
    #[must_use]
    pub const fn options(&self) -> &GameOptions {
        &self.options
    }

    /// The grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Players in join order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The active turn, once the game has started.
    #[must_use]
    pub const fn current_turn(&self) -> Option<&Turn> {
        self.current_turn.as_ref()
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Latest win condition, once the game has started.
    #[must_use]
    pub const fn win_condition(&self) -> Option<&WinCondition> {
        self.win_condition.as_ref()
    }

    /// Seed used for rock placement, once chosen.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Accepted actions, oldest first.
    #[must_use]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Number of accepted actions.
    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.move_seq
    }

    /// Project scores from the grid, in join order.
    #[must_use]
    pub fn scores(&self) -> Vec<ScoreLine> {
        project_scores(&self.grid, &self.players)
    }

    /// Positions a move may currently target.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Position> {
        if self.status == GameStatus::Running {
            self.grid.empty_positions()
        } else {
            Vec::new()
        }
    }

    /// Add a player to a pending game.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not pending, the id is taken, or the
    /// roster is full.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.status != GameStatus::Pending {
            return Err(GameError::NotPending(self.status));
        }
        if self.player(player.id).is_some() {
            return Err(GameError::DuplicatePlayer(player.id));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::TooManyPlayers { max: MAX_PLAYERS });
        }
        self.players.push(player);
        Ok(())
    }

    /// Set a player's lobby readiness.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not in the game.
    pub fn set_ready(&mut self, id: PlayerId, ready: bool) -> Result<(), GameError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownPlayer(id))?;
        player.is_ready = ready;
        Ok(())
    }

    /// Build the board and open the first turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not pending or has too few players.
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if !self.status.can_transition_to(GameStatus::Starting) {
            return Err(GameError::InvalidTransition {
                from: self.status,
                to: GameStatus::Starting,
            });
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::TooFewPlayers {
                count: self.players.len(),
                min: MIN_PLAYERS,
            });
        }

        let mut events = Vec::new();
        self.set_status(GameStatus::Starting, &mut events);

        let seed = self.options.seed.unwrap_or_else(rand::random);
        self.seed = Some(seed);
        self.grid.clear();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        place_rocks(&mut self.grid, self.options.rock_density, &mut rng);

        self.move_seq = 0;
        self.next_region_id = 1;
        self.history.clear();
        for player in &mut self.players {
            player.score = 0;
        }
        self.current_turn = Some(Turn::first(
            self.players[0].id,
            self.options.turn_time_limit_secs,
            Utc::now(),
        ));
        self.win_condition = Some(evaluate(&self.grid, &self.players));

        self.set_status(GameStatus::Running, &mut events);
        tracing::info!(
            seed,
            players = self.players.len(),
            width = self.grid.width(),
            height = self.grid.height(),
            "game started"
        );
        Ok(events)
    }

    /// Validate and apply a placement, capture enclosed regions, re-evaluate
    /// victory and advance the turn.
    ///
    /// # Errors
    ///
    /// Returns why the move was rejected: game not running, then out of
    /// bounds, not the player's turn, or cell not empty. A rejected move
    /// changes nothing.
    pub fn apply_move(&mut self, player: PlayerId, pos: Position) -> Result<MoveOutcome, MoveError> {
        let current = self.turn_holder()?;
        validate_move(&self.grid, current, player, pos)
            .map_err(|e| self.name_stranger(player, e))?;

        self.move_seq += 1;
        let seq = self.move_seq;
        let mut events = vec![GameEvent::CellPlaced {
            position: pos,
            player,
        }];

        self.grid.set(pos, Cell::occupied(player, seq));
        let capture = capture_regions(
            &mut self.grid,
            player,
            pos,
            self.options.max_neutral_edges,
            seq,
            &mut self.next_region_id,
        );

        let color = self.player(player).map(|p| p.color.clone()).unwrap_or_default();
        for region in &capture.regions {
            events.push(GameEvent::RegionCaptured {
                region_id: region.id,
                cells: region.cells.clone(),
                player,
                color: color.clone(),
            });
        }

        let mut losses: BTreeMap<PlayerId, usize> = BTreeMap::new();
        for orphan in &capture.orphans {
            *losses.entry(orphan.previous_owner).or_default() += 1;
        }
        for (losing, count) in losses {
            events.push(GameEvent::OpponentTilesCaptured {
                capturing: player,
                losing,
                count,
            });
        }

        if let Some(turn) = self.current_turn.as_mut() {
            turn.moves.push(pos);
        }
        self.refresh_player_scores();

        let turn_number = self.current_turn.as_ref().map_or(0, |t| t.turn_number);
        self.history.push(MoveRecord {
            seq,
            turn_number,
            player,
            action: MoveAction::Place(pos),
            regions: capture.regions.iter().map(|r| r.id).collect(),
        });

        let win_condition = self.settle(&mut events);

        Ok(MoveOutcome {
            position: pos,
            player,
            regions: capture.regions,
            captured: capture.captured,
            win_condition,
            events,
            grid: self.grid.clone(),
        })
    }

    /// Pass the turn without placing.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not running or `player` does not hold
    /// the turn.
    pub fn pass_turn(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, MoveError> {
        let current = self.turn_holder()?;
        if player != current {
            return Err(self.name_stranger(player, MoveError::NotYourTurn { player, current }));
        }

        self.move_seq += 1;
        let turn_number = self.current_turn.as_ref().map_or(0, |t| t.turn_number);
        self.history.push(MoveRecord {
            seq: self.move_seq,
            turn_number,
            player,
            action: MoveAction::Pass,
            regions: Vec::new(),
        });

        let mut events = vec![GameEvent::TurnPassed { player }];
        self.settle(&mut events);
        Ok(events)
    }

    /// Re-evaluate victory from the current grid, ending the game if decided.
    ///
    /// Once the game is ending or ended the stored result is final and is
    /// returned unchanged.
    pub fn refresh_win_condition(&mut self) -> WinCondition {
        if matches!(self.status, GameStatus::Ending | GameStatus::Ended)
            && let Some(win) = &self.win_condition
        {
            return win.clone();
        }

        let win = evaluate(&self.grid, &self.players);
        self.win_condition = Some(win.clone());
        if win.is_decided() && matches!(self.status, GameStatus::Running | GameStatus::Paused) {
            let mut events = Vec::new();
            self.end(win.clone(), &mut events);
        }
        win
    }

    /// Report elapsed seconds on the active turn's advisory clock.
    ///
    /// Returns whether the turn has run out of time. Nothing is enforced.
    pub fn record_turn_elapsed(&mut self, secs: u32) -> bool {
        self.current_turn.as_mut().is_some_and(|turn| {
            turn.record_elapsed(secs);
            turn.is_expired()
        })
    }

    /// Halt a running game.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is running.
    pub fn pause(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.transition(GameStatus::Running, GameStatus::Paused)
    }

    /// Resume a paused game.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is paused.
    pub fn resume(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.transition(GameStatus::Paused, GameStatus::Running)
    }

    /// End the game now, ranking players as if the board were full.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is running or paused.
    pub fn finish(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if !self.status.can_transition_to(GameStatus::Ending) {
            return Err(GameError::InvalidTransition {
                from: self.status,
                to: GameStatus::Ending,
            });
        }
        let counts = tile_counts(&self.grid, &self.players);
        let win = evaluate_counts(&counts, self.grid.playable_cells(), 0);
        self.win_condition = Some(win.clone());

        let mut events = Vec::new();
        self.end(win, &mut events);
        Ok(events)
    }

    /// Return to `Pending`, clearing the board, turns and history.
    ///
    /// Players stay in the roster but must ready up again.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.grid.clear();
        self.current_turn = None;
        self.win_condition = None;
        self.seed = self.options.seed;
        self.move_seq = 0;
        self.next_region_id = 1;
        self.history.clear();
        for player in &mut self.players {
            player.score = 0;
            player.is_ready = false;
        }
        self.set_status(GameStatus::Pending, &mut events);
        events
    }

    /// The player holding the turn, if moves are accepted.
    fn turn_holder(&self) -> Result<PlayerId, MoveError> {
        if self.status != GameStatus::Running {
            return Err(MoveError::GameNotRunning {
                status: self.status,
            });
        }
        self.current_turn
            .as_ref()
            .map(|t| t.player_id)
            .ok_or(MoveError::GameNotRunning {
                status: self.status,
            })
    }

    /// A turn rejection for a player who never joined reports the unknown id.
    fn name_stranger(&self, player: PlayerId, error: MoveError) -> MoveError {
        match error {
            MoveError::NotYourTurn { .. } if self.player(player).is_none() => {
                MoveError::UnknownPlayer(player)
            }
            other => other,
        }
    }

    /// Re-evaluate victory, then either end the game or advance the turn.
    fn settle(&mut self, events: &mut Vec<GameEvent>) -> WinCondition {
        let win = evaluate(&self.grid, &self.players);
        self.win_condition = Some(win.clone());

        if win.is_decided() {
            self.end(win.clone(), events);
        } else if let Some(turn) = self.current_turn.take() {
            let order: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
            let (_, next) = advance_turn(turn, &order, self.options.turn_time_limit_secs, Utc::now());
            events.push(GameEvent::TurnAdvanced {
                turn_number: next.turn_number,
                player: next.player_id,
            });
            self.current_turn = Some(next);
        }
        win
    }

    fn end(&mut self, win: WinCondition, events: &mut Vec<GameEvent>) {
        self.set_status(GameStatus::Ending, events);
        if let Some(turn) = self.current_turn.as_mut() {
            turn.end_time = Some(Utc::now());
        }
        tracing::info!(winners = ?win.winners, kind = ?win.kind, reason = %win.reason, "game ended");
        events.push(GameEvent::GameEnded(win));
        self.set_status(GameStatus::Ended, events);
    }

    fn refresh_player_scores(&mut self) {
        for line in project_scores(&self.grid, &self.players) {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == line.player_id) {
                player.score = u32::try_from(line.tiles_owned).unwrap_or(u32::MAX);
            }
        }
    }

    fn transition(&mut self, from: GameStatus, to: GameStatus) -> Result<Vec<GameEvent>, GameError> {
        if self.status != from || !from.can_transition_to(to) {
            return Err(GameError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        let mut events = Vec::new();
        self.set_status(to, &mut events);
        Ok(events)
    }

    fn set_status(&mut self, to: GameStatus, events: &mut Vec<GameEvent>) {
        let from = self.status;
        self.status = to;
        tracing::info!(?from, ?to, "status changed");
        events.push(GameEvent::StatusChanged { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveErrorKind;
    use crate::game::{CellType, WinKind, check_invariants};

    fn options(width: u16, height: u16) -> GameOptions {
        GameOptions {
            width,
            height,
            rock_density: 0,
            seed: Some(1),
            ..GameOptions::default()
        }
    }

    fn create_test_game(players: u8) -> Game {
        let mut game = Game::new(options(8, 8)).unwrap();
        for id in 1..=players {
            game.add_player(Player::new(id, format!("P{id}"), format!("color{id}")))
                .unwrap();
        }
        game.start().unwrap();
        game
    }

    #[test]
    fn test_status_transitions() {
        use GameStatus::{Ended, Ending, Paused, Pending, Running, Starting};
        assert!(Pending.can_transition_to(Starting));
        assert!(Starting.can_transition_to(Running));
        assert!(Running.can_transition_to(Paused));
        assert!(Paused.can_transition_to(Running));
        assert!(Running.can_transition_to(Ending));
        assert!(Ending.can_transition_to(Ended));
        assert!(Ended.can_transition_to(Pending));

        assert!(!Ended.can_transition_to(Running));
        assert!(!Pending.can_transition_to(Running));
        assert!(!Ending.can_transition_to(Paused));
        assert!(!Running.can_transition_to(Starting));
    }

    #[test]
    fn test_game_creation() {
        let game = Game::new(options(8, 8)).unwrap();
        assert_eq!(game.status(), GameStatus::Pending);
        assert!(game.current_turn().is_none());
        assert!(Game::new(options(2, 8)).is_err());
    }

    #[test]
    fn test_roster_rules() {
        let mut game = Game::new(options(8, 8)).unwrap();
        game.add_player(Player::new(1, "a", "red")).unwrap();
        assert_eq!(
            game.add_player(Player::new(1, "b", "blue")),
            Err(GameError::DuplicatePlayer(1))
        );
        assert!(matches!(game.start(), Err(GameError::TooFewPlayers { .. })));

        game.add_player(Player::new(2, "b", "blue")).unwrap();
        game.set_ready(2, true).unwrap();
        assert!(game.player(2).unwrap().is_ready);
        assert_eq!(game.set_ready(9, true), Err(GameError::UnknownPlayer(9)));

        game.start().unwrap();
        assert!(matches!(
            game.add_player(Player::new(3, "c", "green")),
            Err(GameError::NotPending(GameStatus::Running))
        ));
    }

    #[test]
    fn test_start_opens_first_turn() {
        let game = create_test_game(2);
        assert_eq!(game.status(), GameStatus::Running);
        let turn = game.current_turn().unwrap();
        assert_eq!(turn.player_id, 1);
        assert_eq!(turn.turn_number, 1);
        assert_eq!(game.seed(), Some(1));
        assert!(!game.win_condition().unwrap().has_winner);
    }

    #[test]
    fn test_apply_move_advances_turn() {
        let mut game = create_test_game(2);
        let outcome = game.apply_move(1, Position::new(3, 3)).unwrap();

        assert_eq!(outcome.grid.get(Position::new(3, 3)).unwrap().owner(), Some(1));
        assert!(outcome.regions.is_empty());
        assert!(matches!(outcome.events[0], GameEvent::CellPlaced { player: 1, .. }));
        assert_eq!(game.current_turn().unwrap().player_id, 2);
        assert_eq!(game.player(1).unwrap().score, 1);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.grid().get(Position::new(3, 3)).unwrap().last_modified, 1);
    }

    #[test]
    fn test_rejected_moves_do_not_mutate() {
        let mut game = create_test_game(2);
        let before = game.clone();

        let err = game.apply_move(2, Position::new(0, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::NotYourTurn);
        let err = game.apply_move(1, Position::new(8, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::OutOfBounds);
        assert_eq!(game, before);

        game.apply_move(1, Position::new(0, 0)).unwrap();
        let err = game.apply_move(2, Position::new(0, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::CellOccupied);
    }

    #[test]
    fn test_moves_rejected_unless_running() {
        let mut game = Game::new(options(8, 8)).unwrap();
        let err = game.apply_move(1, Position::new(0, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::GameNotRunning);

        let mut game = create_test_game(2);
        game.pause().unwrap();
        let err = game.apply_move(1, Position::new(0, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::GameNotRunning);
        assert!(game.pass_turn(1).is_err());

        game.resume().unwrap();
        assert!(game.apply_move(1, Position::new(0, 0)).is_ok());
        assert!(game.resume().is_err());
    }

    #[test]
    fn test_pass_turn() {
        let mut game = create_test_game(3);
        assert!(game.pass_turn(2).is_err());

        let events = game.pass_turn(1).unwrap();
        assert_eq!(events[0], GameEvent::TurnPassed { player: 1 });
        assert_eq!(game.current_turn().unwrap().player_id, 2);
        assert_eq!(game.history()[0].action, MoveAction::Pass);
    }

    #[test]
    fn test_capture_through_apply_move() {
        let mut game = create_test_game(2);
        // Player 1 rings (4,4); player 2 plays far away
        let ring = [Position::new(4, 3), Position::new(3, 4), Position::new(5, 4)];
        let filler = [Position::new(7, 7), Position::new(6, 7), Position::new(5, 7)];
        for (a, b) in ring.iter().zip(filler.iter()) {
            game.apply_move(1, *a).unwrap();
            game.apply_move(2, *b).unwrap();
        }
        let outcome = game.apply_move(1, Position::new(4, 5)).unwrap();

        assert_eq!(outcome.regions.len(), 1);
        assert_eq!(outcome.captured, vec![Position::new(4, 4)]);
        assert_eq!(game.player(1).unwrap().score, 5);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::RegionCaptured { color, .. } if color == "color1")));
        assert_eq!(game.history().last().unwrap().regions, vec![1]);
    }

    #[test]
    fn test_orphan_capture_emits_score_event() {
        let mut game = create_test_game(2);
        // Player 2 sits at (2,2); player 1 surrounds it
        let p1 = [Position::new(2, 1), Position::new(1, 2), Position::new(3, 2)];
        let p2 = [Position::new(2, 2), Position::new(7, 7), Position::new(6, 7)];
        for (a, b) in p1.iter().zip(p2.iter()) {
            game.apply_move(1, *a).unwrap();
            game.apply_move(2, *b).unwrap();
        }
        let outcome = game.apply_move(1, Position::new(2, 3)).unwrap();

        assert_eq!(outcome.captured, vec![Position::new(2, 2)]);
        assert!(outcome.events.contains(&GameEvent::OpponentTilesCaptured {
            capturing: 1,
            losing: 2,
            count: 1,
        }));
        assert_eq!(game.player(2).unwrap().score, 2);
    }

    #[test]
    fn test_finish_ranks_current_territory() {
        let mut game = create_test_game(2);
        game.apply_move(1, Position::new(0, 0)).unwrap();
        game.pass_turn(2).unwrap();

        let events = game.finish().unwrap();
        assert_eq!(game.status(), GameStatus::Ended);
        let win = game.win_condition().unwrap();
        assert_eq!(win.winners, vec![1]);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameEnded(_))));
        assert!(game.finish().is_err());
        assert!(game.pass_turn(2).is_err());
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut game = create_test_game(2);
        game.apply_move(1, Position::new(0, 0)).unwrap();
        game.finish().unwrap();

        game.restart();
        assert_eq!(game.status(), GameStatus::Pending);
        assert_eq!(game.grid().count_type(CellType::Empty), 64);
        assert!(game.history().is_empty());
        assert!(game.current_turn().is_none());
        assert_eq!(game.player(1).unwrap().score, 0);

        game.start().unwrap();
        assert_eq!(game.status(), GameStatus::Running);
    }

    #[test]
    fn test_turn_clock_is_advisory() {
        let mut game = create_test_game(2);
        assert!(!game.record_turn_elapsed(10));
        assert!(game.record_turn_elapsed(100));
        // Still accepts the move
        assert!(game.apply_move(1, Position::new(0, 0)).is_ok());
        assert_eq!(game.current_turn().unwrap().time_remaining, 30);
    }

    #[test]
    fn test_unregistered_player_rejected() {
        let mut game = create_test_game(2);
        let before = game.clone();

        let err = game.apply_move(7, Position::new(0, 0)).unwrap_err();
        assert_eq!(err, MoveError::UnknownPlayer(7));
        assert_eq!(err.kind(), MoveErrorKind::UnknownPlayer);
        assert_eq!(game.pass_turn(7).unwrap_err(), MoveError::UnknownPlayer(7));

        // Bounds still come first; a joined player out of turn is not unknown
        let err = game.apply_move(7, Position::new(8, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::OutOfBounds);
        let err = game.apply_move(2, Position::new(0, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::NotYourTurn);
        assert_eq!(game, before);
    }

    #[test]
    fn test_refresh_win_condition_keeps_open_game_running() {
        let mut game = create_test_game(2);
        assert_eq!(game.refresh_win_condition().kind, WinKind::Undecided);
        assert_eq!(game.status(), GameStatus::Running);
    }

    #[test]
    fn test_refresh_win_condition_ends_decided_game() {
        let mut game = create_test_game(2);
        // Hand player 1 a majority without going through apply_move
        for idx in 0..40 {
            let pos = game.grid.position_of(idx);
            game.grid.set(pos, Cell::occupied(1, 0));
        }
        game.refresh_player_scores();
        assert_eq!(game.status(), GameStatus::Running);

        let win = game.refresh_win_condition();
        assert_eq!(win.kind, WinKind::Majority);
        assert_eq!(win.winners, vec![1]);
        assert_eq!(game.status(), GameStatus::Ended);
        assert_eq!(game.win_condition(), Some(&win));
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_refresh_after_finish_keeps_result() {
        let mut game = create_test_game(2);
        game.apply_move(1, Position::new(0, 0)).unwrap();
        game.finish().unwrap();
        let final_result = game.win_condition().cloned().unwrap();
        assert_eq!(final_result.kind, WinKind::BoardFull);

        let refreshed = game.refresh_win_condition();
        assert_eq!(refreshed, final_result);
        assert_eq!(game.win_condition(), Some(&final_result));
        assert_eq!(game.status(), GameStatus::Ended);
        assert!(check_invariants(&game).is_empty());
    }
}
