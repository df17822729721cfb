//! Event ports - Re-emitting combat events and notifying equipment

use crate::domain::events::{CombatEvent, ItemHit};
use crate::domain::value_objects::CharacterId;

/// Port for emitting an event on a character
///
/// Emitted events are delivered after the current handler returns.
pub trait EventEmitterPort: Send + Sync {
    fn emit(&self, actor: CharacterId, event: CombatEvent);
}

/// Port for notifying item scripts (on-hit procs and the like)
pub trait ItemEventPort: Send + Sync {
    fn item_hit(&self, event: ItemHit);
}
