//! Simulate command implementation.

// Throughput reporting uses intentional float conversions
#![allow(clippy::cast_precision_loss)]

use super::output::{JsonSimulationResult, format_simulation_csv, format_simulation_text};
use super::{CliError, SimulateFormat, check_player_count};
use conquer::GameOptions;
use conquer::playout::{PlayoutStats, default_roster, run_playout};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the options are invalid or output fails.
pub(crate) fn execute(
    options: GameOptions,
    players: usize,
    games: u64,
    threads: Option<usize>,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    check_player_count(players)?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = options.seed.unwrap_or_else(rand::random);
    let names: Vec<String> = default_roster(players).into_iter().map(|p| p.name).collect();

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    tracing::info!(games, players, base_seed, "starting simulation");
    let start = Instant::now();

    // Each thread accumulates into its own stats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || PlayoutStats::new(players),
            |mut local_stats, i| {
                let seed = base_seed.wrapping_add(i);
                match run_playout(seed, &options, players) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => tracing::warn!(seed, error = %e, "playout failed"),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || PlayoutStats::new(players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SimulateFormat::Text => {
            println!("Base seed: {base_seed}");
            println!();
            print!("{}", format_simulation_text(&stats, &names));
            println!();
            println!("Duration: {:.2}s ({:.0} games/sec)", duration.as_secs_f64(), games_per_sec);
        }
        SimulateFormat::Json => {
            let json_result = JsonSimulationResult::from_stats(&stats, &names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_simulation_csv(&stats, &names));
        }
    }

    Ok(())
}
