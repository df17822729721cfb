//! Per-tick combat driver - `updateTick`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{CombatEventError, CombatListener, CombatPorts, PromptBuilder};
use crate::application::ports::outbound::{
    CombatEnginePort, CombatError, SessionPort, TransportKind, WorldStatePort, COMBAT_PROMPT,
};
use crate::domain::events::CombatEvent;
use crate::domain::value_objects::CharacterId;

pub const INVALID_TARGET_MESSAGE: &str = "You can't attack that target.";

/// Advances a fighting character by one tick and frames the output
pub struct TickCoordinator {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
    engine: Arc<dyn CombatEnginePort>,
}

impl TickCoordinator {
    pub fn new(ports: &CombatPorts) -> Self {
        Self {
            world: Arc::clone(&ports.world),
            sessions: Arc::clone(&ports.sessions),
            engine: Arc::clone(&ports.engine),
        }
    }

    pub fn update_tick(&self, actor: CharacterId) -> Result<(), CombatEventError> {
        self.engine.start_regeneration(actor)?;

        let had_actions = match self.engine.update_round(actor) {
            Ok(had_actions) => had_actions,
            Err(CombatError::InvalidTarget(reason)) => {
                debug!(actor = %actor, reason = %reason, "Round skipped, invalid target");
                self.sessions.say(actor, INVALID_TARGET_MESSAGE);
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !had_actions {
            return Ok(());
        }

        let rendered = self
            .sessions
            .transport(actor)
            .is_some_and(TransportKind::is_rendered);

        if rendered && !self.sessions.has_prompt(actor, COMBAT_PROMPT) {
            let world = Arc::clone(&self.world);
            self.sessions.add_prompt(
                actor,
                COMBAT_PROMPT,
                Arc::new(move || PromptBuilder::render(world.as_ref(), actor)),
            );
        }

        self.sessions.say(actor, "");
        if rendered {
            self.sessions.show_prompt(actor);
        }
        Ok(())
    }
}

#[async_trait]
impl CombatListener for TickCoordinator {
    async fn on_event(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        match event {
            CombatEvent::UpdateTick => self.update_tick(actor),
            _ => Ok(()),
        }
    }
}
