//! Combat presentation services
//!
//! Reactions to combat lifecycle events: narration, party fan-out, the
//! in-combat prompt, the death/respawn flow and kill credit. Combat math is
//! owned by the engine behind [`CombatEnginePort`]; everything here reacts to
//! outcomes that have already been decided.

mod combat_notifier;
mod death_transition;
mod deathblow_attribution;
mod event_service;
mod experience_award;
pub mod message_formatter;
mod party_broadcaster;
mod prompt_builder;
mod registry;
mod tick_coordinator;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use combat_notifier::CombatNotifier;
pub use death_transition::DeathTransition;
pub use deathblow_attribution::DeathblowAttribution;
pub use event_service::CombatEventService;
pub use experience_award::ExperienceAward;
pub use party_broadcaster::PartyBroadcaster;
pub use prompt_builder::PromptBuilder;
pub use registry::{CombatEventRegistry, CombatListener};
pub use tick_coordinator::TickCoordinator;

use crate::application::ports::outbound::{
    CharacterPersistencePort, CombatEnginePort, CombatError, CommandPort, EventEmitterPort,
    ExperienceCurvePort, ItemEventPort, MovementPort, SessionPort, WorldError, WorldStatePort,
};
use crate::domain::entities::Character;
use crate::domain::value_objects::{CharacterId, RoomRef};

/// Combat layer settings
#[derive(Debug, Clone, Default)]
pub struct CombatConfig {
    /// Respawn room for characters without a home waypoint
    pub starting_room: Option<RoomRef>,
}

/// Host collaborators the combat services depend on
#[derive(Clone)]
pub struct CombatPorts {
    pub world: Arc<dyn WorldStatePort>,
    pub sessions: Arc<dyn SessionPort>,
    pub engine: Arc<dyn CombatEnginePort>,
    pub movement: Arc<dyn MovementPort>,
    pub commands: Arc<dyn CommandPort>,
    pub persistence: Arc<dyn CharacterPersistencePort>,
    pub emitter: Arc<dyn EventEmitterPort>,
    pub items: Arc<dyn ItemEventPort>,
    pub experience: Arc<dyn ExperienceCurvePort>,
}

impl CombatPorts {
    pub fn party_broadcaster(&self) -> PartyBroadcaster {
        PartyBroadcaster::new(Arc::clone(&self.world), Arc::clone(&self.sessions))
    }
}

/// Errors surfaced by combat event handlers
#[derive(Debug, thiserror::Error)]
pub enum CombatEventError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("No respawn room for character {0}")]
    NoRespawnRoom(CharacterId),

    #[error("Failed to save character: {0}")]
    Persistence(String),
}

/// Load the character an event is delivered to
fn load_character(
    world: &dyn WorldStatePort,
    id: CharacterId,
) -> Result<Character, CombatEventError> {
    world
        .character(id)
        .ok_or(CombatEventError::World(WorldError::CharacterNotFound(id)))
}
