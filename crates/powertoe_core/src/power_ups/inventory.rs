//! Per-player power-up availability and cooldowns.

use super::PowerUpKind;
use crate::Player;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, instrument};

/// Availability of one power-up for one player.
///
/// `cooldown > 0` always means `available == false`; the slot becomes
/// available again on the tick that brings the cooldown to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PowerUpSlot {
    available: bool,
    cooldown: u32,
}

impl PowerUpSlot {
    /// A ready slot.
    pub fn ready() -> Self {
        Self {
            available: true,
            cooldown: 0,
        }
    }

    fn consume(&mut self, cooldown: u32) {
        self.cooldown = cooldown;
        self.available = cooldown == 0;
    }

    fn tick(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            if self.cooldown == 0 {
                self.available = true;
            }
        }
    }
}

impl Default for PowerUpSlot {
    fn default() -> Self {
        Self::ready()
    }
}

/// One player's power-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpInventory {
    slots: [PowerUpSlot; PowerUpKind::COUNT],
}

impl PowerUpInventory {
    /// All power-ups ready.
    pub fn new() -> Self {
        Self {
            slots: [PowerUpSlot::ready(); PowerUpKind::COUNT],
        }
    }

    /// Slot for `kind`.
    pub fn slot(&self, kind: PowerUpKind) -> PowerUpSlot {
        self.slots[kind.slot_index()]
    }

    /// Checks if `kind` can be activated now.
    pub fn is_available(&self, kind: PowerUpKind) -> bool {
        let slot = self.slot(kind);
        slot.available && slot.cooldown == 0
    }

    /// Marks `kind` used and starts its cooldown.
    pub(crate) fn consume(&mut self, kind: PowerUpKind, cooldown: u32) {
        self.slots[kind.slot_index()].consume(cooldown);
    }

    /// Decrements every running cooldown by one.
    pub(crate) fn tick(&mut self) {
        self.slots.iter_mut().for_each(PowerUpSlot::tick);
    }

    /// Kinds that can be activated now.
    pub fn ready_kinds(&self) -> Vec<PowerUpKind> {
        PowerUpKind::iter().filter(|k| self.is_available(*k)).collect()
    }

    /// Iterates `(kind, slot)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, PowerUpSlot)> + '_ {
        PowerUpKind::iter().map(|k| (k, self.slot(k)))
    }
}

impl Default for PowerUpInventory {
    fn default() -> Self {
        Self::new()
    }
}

/// Power-ups of both players.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerUpState {
    x: PowerUpInventory,
    o: PowerUpInventory,
}

impl PowerUpState {
    /// Fresh state, everything ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inventory of `player`.
    pub fn for_player(&self, player: Player) -> &PowerUpInventory {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    pub(crate) fn for_player_mut(&mut self, player: Player) -> &mut PowerUpInventory {
        match player {
            Player::X => &mut self.x,
            Player::O => &mut self.o,
        }
    }

    /// One cooldown tick for both players.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn tick(&mut self) {
        self.x.tick();
        self.o.tick();
        debug!(
            x_ready = self.x.ready_kinds().len(),
            o_ready = self.o.ready_kinds().len(),
            "Cooldowns ticked"
        );
    }
}
