//! Turn sequencing.
//!
//! Players act in fixed join order. The turn number counts full rounds: it
//! only increases when play wraps back to the first player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{PlayerId, Position};

/// The active turn. Replaced, not mutated, when play advances; only
/// `moves` and the advisory clock change while it is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Round number, starting at 1.
    pub turn_number: u32,
    /// Player holding the turn.
    pub player_id: PlayerId,
    /// Placements made during this turn.
    pub moves: Vec<Position>,
    /// Time budget in seconds.
    pub time_limit: u32,
    /// Seconds left, as reported by the external timer.
    pub time_remaining: u32,
    /// When the turn opened.
    pub start_time: DateTime<Utc>,
    /// When the turn closed, if it has.
    pub end_time: Option<DateTime<Utc>>,
}

impl Turn {
    /// Open the first turn of a game.
    #[must_use]
    pub fn first(player_id: PlayerId, time_limit: u32, now: DateTime<Utc>) -> Self {
        Self::open(1, player_id, time_limit, now)
    }

    fn open(turn_number: u32, player_id: PlayerId, time_limit: u32, now: DateTime<Utc>) -> Self {
        Self {
            turn_number,
            player_id,
            moves: Vec::new(),
            time_limit,
            time_remaining: time_limit,
            start_time: now,
            end_time: None,
        }
    }

    /// Subtract elapsed seconds from the advisory clock.
    pub fn record_elapsed(&mut self, secs: u32) {
        self.time_remaining = self.time_remaining.saturating_sub(secs);
    }

    /// Whether the advisory clock has run out. Not enforced by the engine.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.time_remaining == 0
    }
}

/// Close `current` and open the turn for the next player in `order`.
///
/// Returns the closed turn and the new one. The turn number increases only
/// when the next player is the first in `order`. If the current holder is
/// no longer in `order`, play restarts from the first player.
#[must_use]
pub fn advance_turn(
    mut current: Turn,
    order: &[PlayerId],
    time_limit: u32,
    now: DateTime<Utc>,
) -> (Turn, Turn) {
    let next_idx = order
        .iter()
        .position(|&id| id == current.player_id)
        .map_or(0, |idx| (idx + 1) % order.len().max(1));
    let next_player = order.get(next_idx).copied().unwrap_or(current.player_id);

    let turn_number = if next_idx == 0 {
        current.turn_number + 1
    } else {
        current.turn_number
    };

    tracing::trace!(from = current.player_id, to = next_player, turn_number, "turn advanced");

    current.end_time = Some(now);
    let next = Turn::open(turn_number, next_player, time_limit, now);
    (current, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_turn() {
        let now = Utc::now();
        let turn = Turn::first(3, 30, now);
        assert_eq!(turn.turn_number, 1);
        assert_eq!(turn.player_id, 3);
        assert_eq!(turn.time_remaining, 30);
        assert!(turn.moves.is_empty());
        assert!(turn.end_time.is_none());
    }

    #[test]
    fn test_round_robin_numbering_three_players() {
        let order = [1, 2, 3];
        let now = Utc::now();
        let mut turn = Turn::first(1, 30, now);
        let mut seen = Vec::new();

        for _ in 0..7 {
            let (closed, next) = advance_turn(turn, &order, 30, now);
            assert_eq!(closed.end_time, Some(now));
            seen.push((next.player_id, next.turn_number));
            turn = next;
        }

        assert_eq!(
            seen,
            vec![(2, 1), (3, 1), (1, 2), (2, 2), (3, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_advance_resets_clock() {
        let now = Utc::now();
        let mut turn = Turn::first(1, 30, now);
        turn.record_elapsed(45);
        assert!(turn.is_expired());

        let (_, next) = advance_turn(turn, &[1, 2], 20, now);
        assert_eq!(next.time_remaining, 20);
        assert!(!next.is_expired());
    }

    #[test]
    fn test_missing_holder_restarts_order() {
        let now = Utc::now();
        let turn = Turn::first(9, 30, now);
        let (_, next) = advance_turn(turn, &[1, 2], 30, now);
        assert_eq!(next.player_id, 1);
        assert_eq!(next.turn_number, 2);
    }
}
