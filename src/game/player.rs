//! Player state.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player.
pub type PlayerId = u8;

/// A participant in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display color, assigned by the caller (e.g. `#e74c3c`).
    pub color: String,
    /// Lobby readiness flag.
    pub is_ready: bool,
    /// Cached tile count for display, refreshed after every move.
    pub score: u32,
}

impl Player {
    /// Create a new player.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            is_ready: false,
            score: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, "Alice", "#ff0000");
        assert_eq!(player.id, 1);
        assert_eq!(player.name, "Alice");
        assert_eq!(player.color, "#ff0000");
        assert!(!player.is_ready);
        assert_eq!(player.score, 0);
    }
}
