//! Powertoe - tic-tac-toe with power-ups
//!
//! Application layer over [`powertoe_core`].
//!
//! # Architecture
//!
//! - **Config**: TOML settings for the AI, power-ups and timers
//! - **Runtime**: lock-protected session with delayed AI moves and cooldown ticks
//! - **Scoreboard**: statistics collected from finished games
//! - **Simulate**: AI-versus-AI matches
//! - **TUI**: full-screen ratatui front-end
//!
//! # Example
//!
//! ```no_run
//! use strictly_powertoe::{AppConfig, SessionHandle};
//! use powertoe_core::GameSession;
//! use rand::SeedableRng;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let session = GameSession::new(config.session_config(false));
//! let handle = SessionHandle::new(session, rand::rngs::StdRng::seed_from_u64(7));
//! handle.select_cell(4).await?;
//! if let Some(task) = handle.schedule_ai_move(config.runtime().think_delay()).await {
//!     task.await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod runtime;
mod scoreboard;
mod simulate;
mod tui;

pub use config::{AiSettings, AppConfig, ConfigError, RuntimeSettings};
pub use runtime::SessionHandle;
pub use scoreboard::{Scoreboard, ScoreboardObserver};
pub use simulate::{Matchup, run as run_simulation};
pub use tui::{Action, App, run as run_tui};
