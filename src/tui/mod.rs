//! Terminal UI for powertoe.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::Action;

use crate::config::AppConfig;
use crate::runtime::SessionHandle;
use crate::scoreboard::ScoreboardObserver;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use powertoe_core::Position;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Runs an interactive game until the user quits.
#[instrument(skip(handle, config, scoreboard))]
pub async fn run(
    handle: SessionHandle,
    config: &AppConfig,
    hotseat: bool,
    scoreboard: &ScoreboardObserver,
) -> Result<()> {
    info!("Starting terminal UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ticker = handle.spawn_cooldown_ticker(config.runtime().cooldown_tick());
    let human = config.ai().symbol().opponent();
    let mut app = App::new(human, hotseat);

    let res = run_game(&mut terminal, &handle, config, &mut app, scoreboard).await;

    ticker.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("Leaving game");
    res
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

async fn run_game(
    terminal: &mut Tui,
    handle: &SessionHandle,
    config: &AppConfig,
    app: &mut App,
    scoreboard: &ScoreboardObserver,
) -> Result<()> {
    let mut pending: Option<JoinHandle<Option<usize>>> = None;

    loop {
        if pending.as_ref().is_some_and(|task| task.is_finished()) {
            if let Some(task) = pending.take() {
                finish_ai_move(task, app).await;
            }
        }
        if pending.is_none() {
            pending = handle
                .schedule_ai_move(config.runtime().think_delay())
                .await;
            if pending.is_some() {
                app.set_status("AI is thinking...");
            }
        }

        let totals = scoreboard.snapshot();
        let view: &App = app;
        handle
            .read(|session| {
                terminal
                    .draw(|frame| ui::draw(frame, session, view, &totals))
                    .map(|_| ())
            })
            .await?;

        // Check for keyboard input (non-blocking)
        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key.code) {
                        app.perform(action, handle).await;
                    }
                }
            }
        }

        if app.should_quit() {
            info!("User quit");
            if let Some(task) = pending.take() {
                task.abort();
            }
            return Ok(());
        }
    }
}

async fn finish_ai_move(task: JoinHandle<Option<usize>>, app: &mut App) {
    match task.await {
        Ok(Some(index)) => {
            let label = Position::from_index(index).map_or("?", Position::label);
            debug!(index, "AI move shown");
            app.set_status(format!("AI played {}", label));
        }
        Ok(None) => app.set_status(""),
        Err(err) if err.is_cancelled() => debug!("AI move cancelled"),
        Err(err) => warn!(error = %err, "AI task failed"),
    }
}
