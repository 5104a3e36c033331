//! Play command implementation - hot-seat game on stdin/stdout.

use super::output::format_result;
use super::{CliError, check_player_count};
use conquer::game::{GameStatus, Position};
use conquer::playout::default_roster;
use conquer::replay::{Recording, render_ascii, render_plain};
use conquer::{Game, GameOptions};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Instant;

const HELP: &str = "Commands: <x> <y> place a cell, pass, show, help, quit\n";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    Place(Position),
    Pass,
    Show,
    Help,
    Quit,
}

/// Parse a line such as `3 4`, `3,4`, `pass` or `quit`.
fn parse_command(line: &str) -> Result<PlayCommand, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "pass" | "p" => return Ok(PlayCommand::Pass),
        "show" | "s" => return Ok(PlayCommand::Show),
        "help" | "h" | "?" => return Ok(PlayCommand::Help),
        "quit" | "q" | "exit" => return Ok(PlayCommand::Quit),
        _ => {}
    }

    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("unrecognized input '{line}'"));
    };
    let x = x.parse().map_err(|_| format!("bad x coordinate '{x}'"))?;
    let y = y.parse().map_err(|_| format!("bad y coordinate '{y}'"))?;
    Ok(PlayCommand::Place(Position::new(x, y)))
}

/// Drive a running game from `input` until it ends, the player quits, or
/// input runs out.
fn run_session<R: BufRead, W: Write>(
    game: &mut Game,
    input: R,
    out: &mut W,
    color: bool,
) -> Result<(), CliError> {
    let render = if color { render_ascii } else { render_plain };
    write!(out, "{}", render(game))?;
    write!(out, "{HELP}")?;

    let mut lines = input.lines();
    while game.status() == GameStatus::Running {
        let Some(turn) = game.current_turn() else {
            break;
        };
        let player = turn.player_id;
        let name = game.player(player).map_or("Unknown", |p| p.name.as_str());
        write!(out, "Player {player} ({name}) > ")?;
        out.flush()?;

        let started = Instant::now();
        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };
        let elapsed = u32::try_from(started.elapsed().as_secs()).unwrap_or(u32::MAX);
        if game.record_turn_elapsed(elapsed) {
            writeln!(out, "(turn time exceeded)")?;
        }

        match parse_command(&line) {
            Ok(PlayCommand::Place(pos)) => match game.apply_move(player, pos) {
                Ok(outcome) => {
                    if !outcome.captured.is_empty() {
                        writeln!(out, "Captured {} cells!", outcome.captured.len())?;
                    }
                    write!(out, "{}", render(game))?;
                }
                Err(e) => writeln!(out, "Rejected: {e}")?,
            },
            Ok(PlayCommand::Pass) => {
                game.pass_turn(player).map_err(|e| CliError::new(e.to_string()))?;
            }
            Ok(PlayCommand::Show) => write!(out, "{}", render(game))?,
            Ok(PlayCommand::Help) => write!(out, "{HELP}")?,
            Ok(PlayCommand::Quit) => break,
            Err(message) => writeln!(out, "{message}. Type 'help' for commands.")?,
        }
    }

    writeln!(out)?;
    write!(out, "{}", format_result(game))?;
    Ok(())
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the game cannot be set up or I/O fails.
pub(crate) fn execute(options: GameOptions, players: usize, save: Option<PathBuf>) -> Result<(), CliError> {
    check_player_count(players)?;

    let mut game = Game::new(options)?;
    for player in default_roster(players) {
        game.add_player(player)?;
    }
    game.start()?;

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    run_session(&mut game, std::io::stdin().lock(), &mut out, color)?;

    if let Some(path) = save
        && let Some(recording) = Recording::from_game(&game)
    {
        recording
            .save(&path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        writeln!(out, "Recording saved to: {}", path.display())?;
    }

    Ok(())
}
