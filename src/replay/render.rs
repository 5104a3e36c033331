//! ASCII renderer for terminal viewing with ANSI colors.

use std::fmt::Write;

use crate::game::{CellState, Game, GameStatus, PlayerId, Position};

/// ANSI color codes for players, by join order.
const PLAYER_COLORS: [&str; 8] = [
    "\x1b[31m", // Red
    "\x1b[34m", // Blue
    "\x1b[32m", // Green
    "\x1b[33m", // Yellow
    "\x1b[35m", // Magenta
    "\x1b[36m", // Cyan
    "\x1b[91m", // Bright Red
    "\x1b[94m", // Bright Blue
];

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const WHITE: &str = "\x1b[37m";
const GRAY: &str = "\x1b[90m";

#[derive(Clone, Copy)]
struct Style {
    color: bool,
}

impl Style {
    fn paint(self, out: &mut String, code: &str, text: &str) {
        if self.color {
            let _ = write!(out, "{code}{text}{RESET}");
        } else {
            out.push_str(text);
        }
    }
}

/// Render game state to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// Round 3  Player 2 to move                 [P1: 5] [P2: 4]
/// ┌─────────────────┐
/// │ . . # . 1 . . . │
/// │ . 2 2 . 1 . . . │
/// └─────────────────┘
///
/// Legend: .=Empty  #=Rock  x=Blocked  *=Special  1-8=Owner
///
/// Player 1 (Red):   5 tiles   9%
/// Player 2 (Blue):  4 tiles   7%
/// ```
#[must_use]
pub fn render_ascii(game: &Game) -> String {
    render(game, Style { color: true })
}

/// Render game state to ASCII without escape codes.
#[must_use]
pub fn render_plain(game: &Game) -> String {
    render(game, Style { color: false })
}

fn render(game: &Game, style: Style) -> String {
    let mut output = String::new();

    render_header(&mut output, game, style);
    render_grid(&mut output, game, style);
    output.push_str("\nLegend: .=Empty  #=Rock  x=Blocked  *=Special  1-8=Owner\n\n");
    render_scores(&mut output, game, style);

    if let Some(win) = game.win_condition()
        && win.is_decided()
    {
        let _ = writeln!(output, "\nGame over: {}", win.reason);
    }

    output
}

/// Render the header line with round, turn holder and scores.
fn render_header(output: &mut String, game: &Game, style: Style) {
    let status = match (game.status(), game.current_turn()) {
        (GameStatus::Running | GameStatus::Paused, Some(turn)) => format!(
            "Round {}  Player {} to move{}",
            turn.turn_number,
            turn.player_id,
            if game.status() == GameStatus::Paused { " (paused)" } else { "" }
        ),
        (status, _) => format!("{status:?}"),
    };
    output.push_str(&status);

    let padding = 40usize.saturating_sub(status.chars().count());
    output.extend(std::iter::repeat_n(' ', padding));

    for player in game.players() {
        let code = player_color(game, player.id);
        style.paint(output, code, &format!("[P{}: {}]", player.id, player.score));
        output.push(' ');
    }
    output.push('\n');
}

/// Render the grid inside a box.
fn render_grid(output: &mut String, game: &Game, style: Style) {
    let grid = game.grid();
    let rule: String = "─".repeat(usize::from(grid.width()) * 2 + 1);

    let _ = writeln!(output, "┌{rule}┐");
    for y in 0..i32::from(grid.height()) {
        output.push_str("│ ");
        for x in 0..i32::from(grid.width()) {
            render_cell(output, game, Position::new(x, y), style);
            output.push(' ');
        }
        output.push_str("│\n");
    }
    let _ = writeln!(output, "└{rule}┘");
}

/// Render a single cell.
fn render_cell(output: &mut String, game: &Game, pos: Position, style: Style) {
    let Some(cell) = game.grid().get(pos) else {
        output.push('?');
        return;
    };

    match cell.state {
        CellState::Empty => style.paint(output, GRAY, "."),
        CellState::Rock => style.paint(output, &format!("{WHITE}{BOLD}"), "#"),
        CellState::Blocked => style.paint(output, GRAY, "x"),
        CellState::Special => style.paint(output, BOLD, "*"),
        CellState::Occupied(owner) => {
            let code = player_color(game, owner);
            style.paint(output, code, &owner_symbol(owner).to_string());
        }
    }
}

/// Single-character owner marker.
fn owner_symbol(owner: PlayerId) -> char {
    char::from_digit(u32::from(owner), 10).unwrap_or('+')
}

/// ANSI color for a player, by join order.
fn player_color(game: &Game, player_id: PlayerId) -> &'static str {
    game.players()
        .iter()
        .position(|p| p.id == player_id)
        .and_then(|idx| PLAYER_COLORS.get(idx))
        .copied()
        .unwrap_or(WHITE)
}

/// Render one score line per player.
fn render_scores(output: &mut String, game: &Game, style: Style) {
    for line in game.scores() {
        let name = game
            .player(line.player_id)
            .map_or("Unknown", |p| p.name.as_str());
        let label = format!("Player {} ({name}):", line.player_id);
        style.paint(output, player_color(game, line.player_id), &label);
        let _ = writeln!(
            output,
            "  {:>3} tiles  {:>3}%",
            line.tiles_owned, line.percentage
        );
    }
}
