//! Minotaur command-line runner
//!
//! Builds a maze session for a player, lets the autopilot play it on a
//! simulated clock and prints the session record followed by one line per
//! move, all as JSON, on stdout. Logs go to stderr.
//!
//! # Usage
//! ```text
//! minotaur --player Ada --difficulty hard --seed 42 --strategy wander
//! ```

#![warn(missing_docs)]

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use minotaur::config::{Difficulty, GameConfig};
use minotaur::game::autopilot::{Autopilot, Strategy, run_session};
use minotaur::game::record::{JsonLinesRecorder, Recorder};
use minotaur::game::{GameSession, SessionSetup};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Minotaur - run a timed maze session and report how it went
#[derive(Parser, Debug)]
#[command(name = "minotaur")]
#[command(about = "Timed maze runs scored against the shortest route", long_about = None)]
#[command(version)]
struct Cli {
    /// Player name stored in the record; blank names become "Player"
    #[arg(long, default_value = minotaur::game::DEFAULT_PLAYER_NAME)]
    player: String,

    /// easy, medium or hard; anything else plays medium
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Seed for maze, exit and autopilot
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// How the autopilot plays (optimal or wander)
    #[arg(long, default_value = "optimal")]
    strategy: Strategy,

    /// Print the maze to stderr before and after the run
    #[arg(long)]
    show_maze: bool,
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

#[instrument(skip(cli), fields(player = %cli.player))]
fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let difficulty = Difficulty::from_name(&cli.difficulty);

    let created = Local::now();
    let setup = SessionSetup {
        player_name: cli.player,
        difficulty,
        seed: cli.seed,
        config: config.clone(),
    };
    let mut session = GameSession::prepare(setup, created).context("preparing session")?;
    if cli.show_maze {
        eprint!("{}", session.render());
    }

    let mut autopilot = Autopilot::new(cli.strategy, cli.seed);
    let metrics = run_session(
        &mut session,
        &mut autopilot,
        created,
        config.move_poll(),
        config.tick(),
    )?;
    info!(
        won = metrics.won,
        moves = metrics.total_moves,
        accuracy = metrics.path_accuracy,
        "Run complete"
    );
    if cli.show_maze {
        eprint!("{}", session.render());
    }

    let record = session
        .record()
        .context("session ended without a record")?;
    let mut recorder = JsonLinesRecorder::new(std::io::stdout().lock());
    recorder.record(&record, &session.move_details())?;
    Ok(())
}
