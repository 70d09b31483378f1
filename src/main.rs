//! Powertoe - Unified CLI
//!
//! Interactive play and AI-versus-AI simulation.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use powertoe_core::{Difficulty, GameSession};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use strictly_powertoe::{
    AppConfig, Matchup, ScoreboardObserver, SessionHandle, run_simulation, run_tui,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const TUI_LOG_FILE: &str = "powertoe.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            difficulty,
            hotseat,
            seed,
        } => run_play(config, difficulty, hotseat, seed).await,
        Command::Simulate {
            games,
            x,
            o,
            seed,
            config,
        } => run_simulate(games, x, o, seed, config),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run an interactive game
#[instrument]
async fn run_play(
    config_path: Option<PathBuf>,
    difficulty: Option<Difficulty>,
    hotseat: bool,
    seed: Option<u64>,
) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(TUI_LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    info!(
        hotseat,
        difficulty = %config.ai().difficulty(),
        "Starting interactive game"
    );
    let scoreboard = ScoreboardObserver::new();
    let session = GameSession::new(config.session_config(hotseat))
        .with_observer(Box::new(scoreboard.clone()));
    let handle = SessionHandle::new(session, rng_for(*config.ai().seed()));
    run_tui(handle, &config, hotseat, &scoreboard).await?;
    println!("{}", scoreboard.snapshot());
    Ok(())
}

/// Run an AI-versus-AI match
#[instrument]
fn run_simulate(
    games: u32,
    x: Difficulty,
    o: Difficulty,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(config_path.as_deref())?;
    let mut rng = rng_for(seed.or(*config.ai().seed()));
    let scoreboard = run_simulation(Matchup::new(games, x, o), &config, &mut rng)?;
    println!("{} (X) vs {} (O)", x, o);
    println!("{}", scoreboard);
    Ok(())
}
