//! Combat event service - Wires every combat reaction into one registry

use std::sync::Arc;

use tracing::instrument;

use super::{
    CombatConfig, CombatEventError, CombatEventRegistry, CombatNotifier, CombatPorts,
    DeathTransition, DeathblowAttribution, ExperienceAward, TickCoordinator,
};
use crate::domain::events::{CombatEvent, EventKind};
use crate::domain::value_objects::CharacterId;

/// Entry point for delivering combat events to the presentation layer
pub struct CombatEventService {
    registry: CombatEventRegistry,
}

impl CombatEventService {
    pub fn new(ports: CombatPorts, config: CombatConfig) -> Self {
        let notifier = Arc::new(CombatNotifier::new(&ports));
        let mut registry = CombatEventRegistry::new();

        registry.register(EventKind::UpdateTick, Arc::new(TickCoordinator::new(&ports)));
        registry.register(EventKind::Hit, notifier.clone());
        registry.register(EventKind::Heal, notifier.clone());
        registry.register(EventKind::Damaged, notifier.clone());
        registry.register(EventKind::Healed, notifier);
        registry.register(
            EventKind::Killed,
            Arc::new(DeathTransition::new(&ports, &config)),
        );
        registry.register(
            EventKind::Deathblow,
            Arc::new(DeathblowAttribution::new(&ports)),
        );
        registry.register(EventKind::Experience, Arc::new(ExperienceAward::new(&ports)));

        Self { registry }
    }

    /// Deliver an event to the character it happened to
    #[instrument(skip(self, event), fields(kind = %event.kind()))]
    pub async fn dispatch(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        self.registry.dispatch(actor, event).await
    }

    #[cfg(test)]
    pub fn registry(&self) -> &CombatEventRegistry {
        &self.registry
    }
}
