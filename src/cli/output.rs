//! Output formatting utilities for CLI.

// Statistics use intentional float conversions
#![allow(clippy::cast_precision_loss)]

use conquer::playout::PlayoutStats;
use conquer::{Game, WinKind};
use serde::Serialize;
use std::fmt::Write;

/// Format a finished (or abandoned) game as human-readable text.
pub(super) fn format_result(game: &Game) -> String {
    let mut output = String::new();

    let seed = game.seed().map_or_else(|| "none".to_string(), |s| s.to_string());
    let _ = writeln!(output, "Game Result (seed: {seed})");
    match game.win_condition() {
        Some(win) if win.has_winner => {
            let names: Vec<String> = win
                .winners
                .iter()
                .map(|id| {
                    let name = game.player(*id).map_or("Unknown", |p| p.name.as_str());
                    format!("Player {id} ({name})")
                })
                .collect();
            let label = if win.kind == WinKind::Tie { "Tied" } else { "Winner" };
            let _ = writeln!(output, "  {label}: {}", names.join(", "));
            let _ = writeln!(output, "  Reason: {}", win.reason);
        }
        Some(win) if win.is_decided() => {
            let _ = writeln!(output, "  No winner: {}", win.reason);
        }
        _ => output.push_str("  Undecided\n"),
    }
    let _ = writeln!(output, "  Moves: {}\n", game.move_count());

    for line in game.scores() {
        let name = game
            .player(line.player_id)
            .map_or("Unknown", |p| p.name.as_str());
        let _ = writeln!(
            output,
            "  Player {}: {} tiles, {}% ({name})",
            line.player_id, line.tiles_owned, line.percentage
        );
    }

    output
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    /// Total games played.
    games_played: u64,
    /// Per-player statistics.
    players: Vec<JsonSimulationPlayer>,
    /// Games with several winners.
    ties: u64,
    /// Games with no winner.
    stalemates: u64,
    /// Games decided by a majority.
    majority_endings: u64,
    /// Games decided by an insurmountable lead.
    early_endings: u64,
    /// Games played until the board filled.
    full_board_endings: u64,
    /// Average placements per game.
    avg_moves: f64,
    /// Average captured regions per game.
    avg_captures: f64,
}

/// JSON-serializable per-player simulation stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationPlayer {
    /// Player id (1-based join order).
    player: usize,
    /// Display name.
    name: String,
    /// Number of outright wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final tile count.
    avg_tiles: f64,
}

impl JsonSimulationResult {
    /// Create from stats and player names.
    pub(super) fn from_stats(stats: &PlayoutStats, names: &[String]) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonSimulationPlayer {
                player: i + 1,
                name: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_tiles: stats.avg_tiles(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            ties: stats.ties,
            stalemates: stats.stalemates,
            majority_endings: stats.majority_endings,
            early_endings: stats.early_endings,
            full_board_endings: stats.full_board_endings,
            avg_moves: stats.avg_moves(),
            avg_captures: stats.avg_captures(),
        }
    }
}

fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(stats: &PlayoutStats, names: &[String]) -> String {
    let mut output = String::new();
    let games = stats.games_played;

    let _ = writeln!(output, "Simulation Results ({games} games)");
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  Player {} ({name}): {:.1}% ({wins} wins)",
            i + 1,
            stats.win_rate(i) * 100.0
        );
    }
    let _ = writeln!(output, "  Ties: {} ({:.1}%)", stats.ties, share(stats.ties, games));
    let _ = writeln!(
        output,
        "  Stalemates: {} ({:.1}%)\n",
        stats.stalemates,
        share(stats.stalemates, games)
    );

    output.push_str("Endings:\n");
    let _ = writeln!(output, "  Majority: {}", stats.majority_endings);
    let _ = writeln!(output, "  Insurmountable lead: {}", stats.early_endings);
    let _ = writeln!(output, "  Full board: {}\n", stats.full_board_endings);

    output.push_str("Average Tiles:\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(output, "  Player {} ({name}): {:.1}", i + 1, stats.avg_tiles(i));
    }

    let _ = writeln!(
        output,
        "\nAverage Game Length: {:.0} moves, {:.1} captures",
        stats.avg_moves(),
        stats.avg_captures()
    );

    output
}

/// Format simulation stats as CSV.
pub(super) fn format_simulation_csv(stats: &PlayoutStats, names: &[String]) -> String {
    let mut output = String::from("player,name,wins,win_rate,avg_tiles\n");

    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{},{:.4},{:.2}",
            i + 1,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_tiles(i)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use conquer::GameOptions;
    use conquer::playout::{default_roster, run_playout, start_game};

    fn stats() -> PlayoutStats {
        let options = GameOptions {
            width: 6,
            height: 6,
            ..GameOptions::default()
        };
        let mut stats = PlayoutStats::new(2);
        for seed in 0..4 {
            stats.add_result(&run_playout(seed, &options, 2).unwrap());
        }
        stats
    }

    fn names() -> Vec<String> {
        vec!["Red".to_string(), "Blue".to_string()]
    }

    #[test]
    fn test_csv_has_row_per_player() {
        let csv = format_simulation_csv(&stats(), &names());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "player,name,wins,win_rate,avg_tiles");
        assert!(lines[1].starts_with("1,Red,"));
        assert!(lines[2].starts_with("2,Blue,"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_simulation_text(&stats(), &names());
        assert!(text.starts_with("Simulation Results (4 games)"));
        assert!(text.contains("Player 2 (Blue)"));
        assert!(text.contains("Average Game Length"));
    }

    #[test]
    fn test_json_fields() {
        let json = serde_json::to_value(JsonSimulationResult::from_stats(&stats(), &names())).unwrap();
        assert_eq!(json["games_played"], 4);
        assert_eq!(json["players"][1]["name"], "Blue");
    }

    #[test]
    fn test_format_result_lists_every_player() {
        let options = GameOptions {
            width: 6,
            height: 6,
            seed: Some(8),
            ..GameOptions::default()
        };
        let mut game = start_game(8, &options, default_roster(3)).unwrap();
        game.finish().unwrap();

        let text = format_result(&game);
        assert!(text.starts_with("Game Result (seed: 8)"));
        assert!(text.contains("No winner"));
        assert!(text.contains("Player 3: 0 tiles, 0% (Green)"));
    }
}
