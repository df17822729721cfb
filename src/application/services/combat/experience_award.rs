//! Experience grants - `experience`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{CombatEventError, CombatListener, CombatPorts};
use crate::application::ports::outbound::{SessionPort, WorldStatePort};
use crate::domain::events::CombatEvent;
use crate::domain::value_objects::CharacterId;

pub struct ExperienceAward {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
}

impl ExperienceAward {
    pub fn new(ports: &CombatPorts) -> Self {
        Self {
            world: Arc::clone(&ports.world),
            sessions: Arc::clone(&ports.sessions),
        }
    }

    pub fn award(&self, actor: CharacterId, amount: u64) -> Result<(), CombatEventError> {
        let mut is_npc = false;
        self.world.modify_character(actor, &mut |c| {
            c.experience = c.experience.saturating_add(amount);
            is_npc = c.is_npc;
        })?;
        debug!(actor = %actor, amount, "Experience awarded");

        if !is_npc {
            self.sessions.say(
                actor,
                &format!("<blue>You gained <b>{amount}</b> experience!</blue>"),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl CombatListener for ExperienceAward {
    async fn on_event(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        match event {
            CombatEvent::Experience { amount } => self.award(actor, *amount),
            _ => Ok(()),
        }
    }
}
