//! Combat events - Lifecycle notifications delivered to a character
//!
//! Every event is delivered to an actor (the character the event is "on").
//! Each variant carries exactly the payload its listeners need, so a
//! listener for one kind can never receive another kind's payload shape.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, CharacterRef, Damage, Heal, ItemId};

/// All combat events understood by this layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// Scheduler tick for a character believed to be in combat
    UpdateTick,

    /// The actor dealt damage to `target`
    Hit {
        damage: Damage,
        target: CharacterRef,
        final_amount: i32,
    },

    /// The actor healed `target` (possibly themself)
    Heal {
        heal: Heal,
        target: CharacterRef,
        final_amount: i32,
    },

    /// The actor took damage
    Damaged { damage: Damage, final_amount: i32 },

    /// The actor was healed
    Healed { heal: Heal, final_amount: i32 },

    /// The actor died
    Killed { killer: Option<CharacterRef> },

    /// The actor landed the killing blow on `target`
    Deathblow {
        target: CharacterRef,
        target_level: u32,
        /// Set when this is a party member's proxied copy of the event
        #[serde(default)]
        skip_party: bool,
    },

    /// The actor earned experience
    Experience { amount: u64 },
}

/// Discriminant of [`CombatEvent`], used as the listener registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UpdateTick,
    Hit,
    Heal,
    Damaged,
    Healed,
    Killed,
    Deathblow,
    Experience,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::UpdateTick => "updateTick",
            EventKind::Hit => "hit",
            EventKind::Heal => "heal",
            EventKind::Damaged => "damaged",
            EventKind::Healed => "healed",
            EventKind::Killed => "killed",
            EventKind::Deathblow => "deathblow",
            EventKind::Experience => "experience",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CombatEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CombatEvent::UpdateTick => EventKind::UpdateTick,
            CombatEvent::Hit { .. } => EventKind::Hit,
            CombatEvent::Heal { .. } => EventKind::Heal,
            CombatEvent::Damaged { .. } => EventKind::Damaged,
            CombatEvent::Healed { .. } => EventKind::Healed,
            CombatEvent::Killed { .. } => EventKind::Killed,
            CombatEvent::Deathblow { .. } => EventKind::Deathblow,
            CombatEvent::Experience { .. } => EventKind::Experience,
        }
    }
}

/// Notification forwarded to a wielded item when its wielder lands a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemHit {
    pub item: ItemId,
    pub wielder: CharacterId,
    pub damage: Damage,
    pub target: CharacterRef,
    pub final_amount: i32,
}
