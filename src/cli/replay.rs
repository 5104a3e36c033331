//! Replay command implementation.

use super::output::format_result;
use super::{CliError, ReplayFormat};
use conquer::game::MoveAction;
use conquer::replay::{Recording, ReplayEngine, render_plain};
use std::path::Path;

/// Default step delay for the replay viewer, in milliseconds.
const REPLAY_SPEED_MS: u64 = 300;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or re-simulated.
pub(crate) fn execute(recording_path: &Path, format: ReplayFormat, start: Option<usize>) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;

    let engine = ReplayEngine::new_at_move(recording, start.unwrap_or(0))?;

    match format {
        ReplayFormat::Tui => super::watch::run_tui(engine, REPLAY_SPEED_MS, false),
        ReplayFormat::Text => print_text_replay(engine),
        ReplayFormat::Final => print_final(engine),
    }
}

fn print_text_replay(mut engine: ReplayEngine) -> Result<(), CliError> {
    println!(
        "Replay of game (seed: {}, {} actions)",
        engine.recording().options.seed.unwrap_or_default(),
        engine.recording().len()
    );
    println!();

    loop {
        println!("=== Move {} ===", engine.position());
        print!("{}", render_plain(engine.state()));
        println!();

        let Some(next) = engine.next_move().cloned() else {
            break;
        };
        match next.action {
            MoveAction::Place(pos) => println!("Player {} places at ({}, {})", next.player, pos.x, pos.y),
            MoveAction::Pass => println!("Player {} passes", next.player),
        }
        engine.step_forward()?;
    }

    print!("{}", format_result(engine.state()));
    Ok(())
}

fn print_final(mut engine: ReplayEngine) -> Result<(), CliError> {
    engine.goto_move(engine.recording().len())?;
    print!("{}", render_plain(engine.state()));
    println!();
    print!("{}", format_result(engine.state()));
    Ok(())
}
