//! Application state and logic.

use super::input::{Action, action_for, move_cursor};
use crate::runtime::SessionHandle;
use crossterm::event::KeyCode;
use powertoe_core::{Activation, EffectSummary, Player, Position};
use tracing::{debug, instrument};

/// Cursor, status message and who the keyboard plays for.
#[derive(Debug, Clone)]
pub struct App {
    cursor: Position,
    status: String,
    human: Player,
    hotseat: bool,
    quit: bool,
}

impl App {
    /// Creates the state for a game where the keyboard plays `human`, or
    /// whoever is to move when `hotseat` is set.
    pub fn new(human: Player, hotseat: bool) -> Self {
        Self {
            cursor: Position::Center,
            status: "Arrows move, Enter places".to_string(),
            human,
            hotseat,
            quit: false,
        }
    }

    /// Highlighted cell.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Latest message.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the status message.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Set once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Moves the cursor for arrow keys; returns the action for anything else.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<Action> {
        let moved = move_cursor(self.cursor, key);
        if moved != self.cursor {
            self.cursor = moved;
            return None;
        }
        action_for(key, self.cursor)
    }

    /// Carries out `action` against the session.
    #[instrument(skip(self, handle))]
    pub async fn perform(&mut self, action: Action, handle: &SessionHandle) {
        debug!(?action, "Handling action");
        match action {
            Action::Quit => self.quit = true,
            Action::Reset => {
                handle.reset().await;
                self.cursor = Position::Center;
                self.set_status("Game restarted. Player X's turn.");
            }
            Action::Select(index) => {
                if let Some(position) = Position::from_index(index) {
                    self.cursor = position;
                }
                let status = match handle.select_cell(index).await {
                    Ok(Some(effect)) => describe(&effect),
                    Ok(None) => format!("Placed on {}", self.cursor.label()),
                    Err(err) => err.to_string(),
                };
                self.set_status(status);
            }
            Action::Power(kind) => {
                let player = if self.hotseat {
                    handle
                        .phase()
                        .await
                        .active_player()
                        .unwrap_or(Player::X)
                } else {
                    self.human
                };
                let status = match handle.activate_power_up(player, kind).await {
                    Ok(Activation::Resolved(effect)) => describe(&effect),
                    Ok(Activation::Armed(kind)) => format!("{} armed: pick a cell", kind.label()),
                    Err(err) => err.to_string(),
                };
                self.set_status(status);
            }
        }
    }
}

/// One-line description of a power-up's effect.
pub fn describe(effect: &EffectSummary) -> String {
    match effect {
        EffectSummary::Frozen { opponent, turns } => {
            format!("{} is frozen for {} turn(s)", opponent, turns)
        }
        EffectSummary::DoubleMoveArmed => "Place two marks this turn".to_string(),
        EffectSummary::Stolen { index } => format!("Cell {} stolen", index + 1),
        EffectSummary::Bombed { cleared, spared } => {
            format!("Bomb cleared {} cell(s), {} shielded", cleared.len(), spared.len())
        }
        EffectSummary::Shielded { index } => format!("Cell {} shielded", index + 1),
        EffectSummary::TimeWarped { undone } => format!("Undid {} move(s)", undone),
        EffectSummary::NoEffect(reason) => format!("No effect ({:?})", reason),
    }
}
