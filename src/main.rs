//! Conquer CLI - play, simulate and watch territory games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Conquer - a turn-based territory game
#[derive(Parser, Debug)]
#[command(name = "conquer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine decisions (captures, turns) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with game options; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a hot-seat game on the terminal
    Play {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Number of players (2-8)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Save recording to file when the game ends
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run many random playouts in parallel and aggregate statistics
    Simulate {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Number of players (2-8)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Number of games to run
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Interactive TUI to watch a random playout
    Watch {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Number of players (2-8)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Move delay in milliseconds
        #[arg(long, default_value = "300")]
        speed: u64,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: tui, text, or final
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Start after this many recorded actions
        #[arg(short = 'm', long = "move")]
        start: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "conquer=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = args.config.as_deref();

    let result = match args.command {
        Commands::Play {
            board,
            players,
            save,
        } => board
            .resolve(config)
            .and_then(|options| cli::play::execute(options, players, save)),

        Commands::Simulate {
            board,
            players,
            games,
            threads,
            format,
            progress,
        } => board.resolve(config).and_then(|options| {
            cli::simulate::execute(options, players, games, threads, format, progress)
        }),

        Commands::Watch {
            board,
            players,
            speed,
        } => board
            .resolve(config)
            .and_then(|options| cli::watch::execute(options, players, speed)),

        Commands::Replay {
            recording,
            format,
            start,
        } => cli::replay::execute(&recording, format, start),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
