//! Power-ups: identifiers, configuration, cooldown bookkeeping and effects.
//!
//! Each power-up is a [`PowerUpKind`] variant. Effects are dispatched with an
//! exhaustive `match` in the session, so a new power-up cannot be added
//! without deciding how it resolves.

pub mod effects;
pub mod inventory;

pub use effects::{EffectSummary, NoEffectReason, ShieldSet, bomb_area};
pub use inventory::{PowerUpInventory, PowerUpSlot, PowerUpState};

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Every power-up a player owns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumCount,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PowerUpKind {
    /// Skip the opponent's next turn.
    Freeze,
    /// Place two marks before the turn passes.
    DoubleMove,
    /// Convert an opponent mark to your own.
    Steal,
    /// Clear a cell and its neighbours.
    Bomb,
    /// Protect a cell from Steal and Bomb.
    Shield,
    /// Undo the last two placements.
    TimeWarp,
}

impl PowerUpKind {
    /// Position of this kind in per-player slot arrays.
    pub(crate) fn slot_index(self) -> usize {
        self as usize
    }

    /// Targeted power-ups are armed first and resolved on the next cell selection.
    pub fn requires_target(self) -> bool {
        match self {
            PowerUpKind::Steal | PowerUpKind::Bomb | PowerUpKind::Shield => true,
            PowerUpKind::Freeze | PowerUpKind::DoubleMove | PowerUpKind::TimeWarp => false,
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Freeze => "Freeze",
            PowerUpKind::DoubleMove => "Double Move",
            PowerUpKind::Steal => "Steal",
            PowerUpKind::Bomb => "Bomb",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::TimeWarp => "Time Warp",
        }
    }
}

/// Cooldown, in ticks, applied after each power-up is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownTable {
    /// Freeze cooldown.
    pub freeze: u32,
    /// Double-Move cooldown.
    pub double_move: u32,
    /// Steal cooldown.
    pub steal: u32,
    /// Bomb cooldown.
    pub bomb: u32,
    /// Shield cooldown.
    pub shield: u32,
    /// Time Warp cooldown.
    pub time_warp: u32,
}

impl CooldownTable {
    /// Cooldown for `kind`.
    pub fn get(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Freeze => self.freeze,
            PowerUpKind::DoubleMove => self.double_move,
            PowerUpKind::Steal => self.steal,
            PowerUpKind::Bomb => self.bomb,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::TimeWarp => self.time_warp,
        }
    }
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self {
            freeze: 3,
            double_move: 4,
            steal: 5,
            bomb: 6,
            shield: 4,
            time_warp: 7,
        }
    }
}

/// Static description of one power-up under a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct PowerUpSpec {
    kind: PowerUpKind,
    cooldown: u32,
    requires_target: bool,
}

/// Tunable power-up rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpRules {
    /// Opponent turns skipped by one Freeze.
    pub freeze_turns: u32,
    /// Per-power-up cooldowns.
    pub cooldowns: CooldownTable,
}

impl PowerUpRules {
    /// Describes `kind` under these rules.
    pub fn spec(&self, kind: PowerUpKind) -> PowerUpSpec {
        PowerUpSpec {
            kind,
            cooldown: self.cooldowns.get(kind),
            requires_target: kind.requires_target(),
        }
    }
}

impl Default for PowerUpRules {
    fn default() -> Self {
        Self {
            freeze_turns: 1,
            cooldowns: CooldownTable::default(),
        }
    }
}
