//! Command-line interface for powertoe.

use clap::{Parser, Subcommand};
use powertoe_core::Difficulty;
use std::path::PathBuf;

/// Powertoe - tic-tac-toe with power-ups against a minimax AI
#[derive(Parser, Debug)]
#[command(name = "powertoe")]
#[command(about = "Tic-tac-toe with power-ups against a minimax AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// AI difficulty (easy, medium, hard, nightmare)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Two local players, no AI
        #[arg(long)]
        hotseat: bool,

        /// Seed for the AI's random choices
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Pit two AIs against each other and print the results
    Simulate {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Difficulty of X
        #[arg(long, default_value = "hard")]
        x: Difficulty,

        /// Difficulty of O
        #[arg(long, default_value = "hard")]
        o: Difficulty,

        /// Seed for the AIs' random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
