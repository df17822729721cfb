//! Domain events - Notifications of combat state changes

pub mod combat_events;

pub use combat_events::{CombatEvent, EventKind, ItemHit};
