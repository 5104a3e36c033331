//! Seeded random playouts.
//!
//! Provides a pure function interface: `(seed, options, players) -> PlayoutResult`
//!
//! A playout drives a whole game with a uniform-random legal move chooser.
//! It is a test and statistics driver, not an opponent: every choice is a
//! uniformly drawn empty cell. The same seed always produces the same game.

// Statistics use intentional float conversions
#![allow(clippy::cast_precision_loss)]

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::GameOptions;
use crate::error::GameError;
use crate::game::{Game, MoveOutcome, Player, PlayerId, WinKind};

/// Default display colors, in join order.
pub const PLAYER_COLORS: [&str; 8] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f1c40f", "#9b59b6", "#1abc9c", "#e67e22", "#95a5a6",
];

/// Default display names, in join order.
pub const PLAYER_NAMES: [&str; 8] = [
    "Red", "Blue", "Green", "Yellow", "Purple", "Teal", "Orange", "Gray",
];

/// Mixed into the playout seed so move choice differs from rock placement.
const MOVE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Build a roster of `count` players with default names and colors.
#[must_use]
pub fn default_roster(count: usize) -> Vec<Player> {
    PLAYER_NAMES
        .iter()
        .zip(PLAYER_COLORS.iter())
        .take(count)
        .zip(1u8..)
        .map(|((name, color), id)| Player::new(id, *name, *color))
        .collect()
}

/// Create and start a game for a playout.
///
/// # Errors
///
/// Returns an error if the options are invalid or the player count is out
/// of range.
pub fn start_game(seed: u64, options: &GameOptions, players: Vec<Player>) -> Result<Game, GameError> {
    let mut game = Game::new(GameOptions {
        seed: Some(seed),
        ..*options
    })?;
    for player in players {
        game.add_player(player)?;
    }
    game.start()?;
    Ok(game)
}

/// Picks uniformly random legal moves.
#[derive(Debug, Clone)]
pub struct RandomMover {
    rng: ChaCha8Rng,
}

impl RandomMover {
    /// Create a mover seeded from the playout seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ MOVE_SEED_SALT),
        }
    }

    /// Play one move for the current turn holder.
    ///
    /// Returns `None` once the game is no longer running or no cell is free.
    pub fn step(&mut self, game: &mut Game) -> Option<MoveOutcome> {
        let player = game.current_turn()?.player_id;
        let pos = *game.legal_moves().choose(&mut self.rng)?;
        game.apply_move(player, pos).ok()
    }
}

/// Result of a single playout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayoutResult {
    /// The seed used for this playout.
    pub seed: u64,
    /// Winning players (empty for a stalemate).
    pub winners: Vec<PlayerId>,
    /// How the game was decided.
    pub kind: WinKind,
    /// Placements made.
    pub moves_played: u32,
    /// Round number the game ended in.
    pub rounds: u32,
    /// Regions captured over the whole game.
    pub captures: u32,
    /// Final tile count per player, in join order.
    pub tiles: Vec<(PlayerId, usize)>,
}

/// Play a complete game with random moves.
///
/// This is the main entry point - a pure function from inputs to result.
///
/// # Errors
///
/// Returns an error if the game cannot be set up.
pub fn run_playout(seed: u64, options: &GameOptions, num_players: usize) -> Result<PlayoutResult, GameError> {
    let mut game = start_game(seed, options, default_roster(num_players))?;
    let mut mover = RandomMover::new(seed);
    let mut captures = 0u32;

    while let Some(outcome) = mover.step(&mut game) {
        captures += u32::try_from(outcome.regions.len()).unwrap_or(u32::MAX);
    }

    let win = game.refresh_win_condition();
    Ok(PlayoutResult {
        seed,
        winners: win.winners,
        kind: win.kind,
        moves_played: game.move_count(),
        rounds: game.current_turn().map_or(0, |t| t.turn_number),
        captures,
        tiles: game
            .scores()
            .iter()
            .map(|line| (line.player_id, line.tiles_owned))
            .collect(),
    })
}

/// Aggregated statistics over many playouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayoutStats {
    /// Total games played.
    pub games_played: u64,
    /// Outright wins per player (index = join order).
    pub wins: Vec<u64>,
    /// Games shared by several winners.
    pub ties: u64,
    /// Games with no winner.
    pub stalemates: u64,
    /// Games ended by a majority.
    pub majority_endings: u64,
    /// Games ended early by an insurmountable lead.
    pub early_endings: u64,
    /// Games that ran until the board was full.
    pub full_board_endings: u64,
    /// Total tiles per player.
    total_tiles: Vec<u64>,
    /// Total placements across all games.
    total_moves: u64,
    /// Total captures across all games.
    total_captures: u64,
}

impl PlayoutStats {
    /// Create new stats for n players.
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            total_tiles: vec![0; num_players],
            ..Self::default()
        }
    }

    /// Add a playout result to the stats.
    pub fn add_result(&mut self, result: &PlayoutResult) {
        self.games_played += 1;
        self.total_moves += u64::from(result.moves_played);
        self.total_captures += u64::from(result.captures);

        match result.winners.as_slice() {
            [] => self.stalemates += 1,
            [winner] => {
                if let Some(wins) = self.wins.get_mut(usize::from(*winner).saturating_sub(1)) {
                    *wins += 1;
                }
            }
            _ => self.ties += 1,
        }

        match result.kind {
            WinKind::Majority => self.majority_endings += 1,
            WinKind::Insurmountable => self.early_endings += 1,
            WinKind::BoardFull | WinKind::Tie | WinKind::Stalemate => self.full_board_endings += 1,
            WinKind::Undecided => {}
        }

        for (i, (_, tiles)) in result.tiles.iter().enumerate() {
            if let Some(total) = self.total_tiles.get_mut(i) {
                *total += *tiles as u64;
            }
        }
    }

    /// Merge stats from another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.ties += other.ties;
        self.stalemates += other.stalemates;
        self.majority_endings += other.majority_endings;
        self.early_endings += other.early_endings;
        self.full_board_endings += other.full_board_endings;
        self.total_moves += other.total_moves;
        self.total_captures += other.total_captures;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_tiles.iter_mut().zip(&other.total_tiles) {
            *a += b;
        }
    }

    /// Win rate for a player (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average final tile count for a player.
    #[must_use]
    pub fn avg_tiles(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_tiles.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average placements per game.
    #[must_use]
    pub fn avg_moves(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games_played as f64
    }

    /// Average captures per game.
    #[must_use]
    pub fn avg_captures(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_captures as f64 / self.games_played as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    fn small_options() -> GameOptions {
        GameOptions {
            width: 8,
            height: 8,
            ..GameOptions::default()
        }
    }

    #[test]
    fn test_default_roster() {
        let roster = default_roster(3);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].id, 1);
        assert_eq!(roster[2].id, 3);
        assert_eq!(roster[1].color, "#3498db");
        assert_eq!(default_roster(20).len(), 8);
    }

    #[test]
    fn test_playout_finishes() {
        let result = run_playout(42, &small_options(), 2).unwrap();
        assert!(result.kind != WinKind::Undecided);
        assert!(result.moves_played > 0);
        assert_eq!(result.tiles.len(), 2);
    }

    #[test]
    fn test_playout_deterministic() {
        let a = run_playout(7, &small_options(), 3).unwrap();
        let b = run_playout(7, &small_options(), 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mover_stops_when_game_ends() {
        let mut game = start_game(5, &small_options(), default_roster(2)).unwrap();
        let mut mover = RandomMover::new(5);
        while mover.step(&mut game).is_some() {}
        assert_eq!(game.status(), GameStatus::Ended);
        assert!(mover.step(&mut game).is_none());
    }

    #[test]
    fn test_playout_rejects_bad_player_count() {
        assert!(run_playout(1, &small_options(), 1).is_err());
    }

    #[test]
    fn test_stats_merge() {
        let options = small_options();
        let mut all = PlayoutStats::new(2);
        let mut left = PlayoutStats::new(2);
        let mut right = PlayoutStats::new(2);
        for seed in 0..6 {
            let result = run_playout(seed, &options, 2).unwrap();
            all.add_result(&result);
            if seed % 2 == 0 {
                left.add_result(&result);
            } else {
                right.add_result(&result);
            }
        }
        left.merge(&right);
        assert_eq!(left, all);
        assert_eq!(all.games_played, 6);
        assert_eq!(
            all.wins.iter().sum::<u64>() + all.ties + all.stalemates,
            6
        );
    }
}
