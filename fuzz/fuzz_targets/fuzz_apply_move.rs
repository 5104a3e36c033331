#![no_main]

//! Move pipeline fuzzer.
//!
//! Drives a game with arbitrary placements and passes, including
//! out-of-bounds targets and moves by players who do not hold the turn.
//! After every action:
//! 1. A rejected action must leave the game untouched
//! 2. Captured cells must match the returned regions
//! 3. Every game invariant must hold

use arbitrary::Arbitrary;
use conquer::GameOptions;
use conquer::game::{Game, Player, Position, check_invariants};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    /// Place a cell (coordinates may be off-grid).
    Place { player: u8, x: i8, y: i8 },
    /// Pass the turn.
    Pass { player: u8 },
}

/// Structured input for move fuzzing.
#[derive(Arbitrary, Debug)]
struct MoveInput {
    width: u8,
    height: u8,
    rock_density: u8,
    max_neutral_edges: u8,
    players: u8,
    seed: u64,
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: MoveInput| {
    let options = GameOptions {
        width: u16::from(input.width % 13 + 4),
        height: u16::from(input.height % 13 + 4),
        rock_density: input.rock_density % 91,
        max_neutral_edges: input.max_neutral_edges % 21,
        seed: Some(input.seed),
        ..GameOptions::default()
    };
    let Ok(mut game) = Game::new(options) else {
        return;
    };
    for id in 1..=(input.players % 7 + 2) {
        if game.add_player(Player::new(id, format!("P{id}"), "#fff")).is_err() {
            return;
        }
    }
    if game.start().is_err() {
        return;
    }

    for action in input.actions.into_iter().take(400) {
        let before = game.clone();
        match action {
            FuzzAction::Place { player, x, y } => {
                match game.apply_move(player % 10, Position::new(i32::from(x), i32::from(y))) {
                    Ok(outcome) => {
                        let listed: usize = outcome.regions.iter().map(|r| r.cells.len()).sum();
                        assert_eq!(listed, outcome.captured.len());
                        assert_eq!(&outcome.grid, game.grid());
                    }
                    Err(_) => assert_eq!(game, before, "rejected move mutated the game"),
                }
            }
            FuzzAction::Pass { player } => {
                if game.pass_turn(player % 10).is_err() {
                    assert_eq!(game, before, "rejected pass mutated the game");
                }
            }
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "Invariant violations: {violations:?}");
    }
});
