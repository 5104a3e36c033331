//! CLI command implementations for Conquer.

pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod simulate;
pub(crate) mod watch;

mod output;

use clap::ValueEnum;
use conquer::{ConfigError, GameError, GameOptions, ReplayError};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Board options shared by every command that starts a game.
///
/// Unset flags fall back to the config file, then to the defaults.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct BoardArgs {
    /// Grid width (4-64)
    #[arg(long)]
    width: Option<u16>,

    /// Grid height (4-64)
    #[arg(long)]
    height: Option<u16>,

    /// Percentage of cells turned into rocks (0-90)
    #[arg(long)]
    rocks: Option<u8>,

    /// Off-grid steps a region may take and still be captured (0-20)
    #[arg(long)]
    edges: Option<u8>,

    /// Advisory seconds per turn
    #[arg(long)]
    turn_time: Option<u32>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,
}

impl BoardArgs {
    /// Merge flags over the config file (if any) and validate the result.
    pub(crate) fn resolve(&self, config: Option<&Path>) -> Result<GameOptions, CliError> {
        let mut options = match config {
            Some(path) => GameOptions::from_json_file(path).map_err(|e| {
                CliError::new(format!("Failed to load config {}: {e}", path.display()))
            })?,
            None => GameOptions::default(),
        };

        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(rocks) = self.rocks {
            options.rock_density = rocks;
        }
        if let Some(edges) = self.edges {
            options.max_neutral_edges = edges;
        }
        if let Some(turn_time) = self.turn_time {
            options.turn_time_limit_secs = turn_time;
        }
        if self.seed.is_some() {
            options.seed = self.seed;
        }

        options.validate()?;
        Ok(options)
    }
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Interactive TUI.
    Tui,
    /// Every position as plain text.
    Text,
    /// Only the final position.
    Final,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

/// Reject player counts the engine would refuse, before any work starts.
pub(crate) fn check_player_count(players: usize) -> Result<(), CliError> {
    if (conquer::game::MIN_PLAYERS..=conquer::game::MAX_PLAYERS).contains(&players) {
        Ok(())
    } else {
        Err(CliError::new(format!(
            "player count must be between {} and {}, got {players}",
            conquer::game::MIN_PLAYERS,
            conquer::game::MAX_PLAYERS
        )))
    }
}
