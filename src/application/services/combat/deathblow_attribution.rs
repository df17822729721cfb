//! Kill credit - `deathblow`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{load_character, CombatEventError, CombatListener, CombatPorts, PartyBroadcaster};
use crate::application::ports::outbound::{
    EventEmitterPort, ExperienceCurvePort, SessionPort, WorldStatePort,
};
use crate::domain::events::CombatEvent;
use crate::domain::value_objects::{CharacterId, CharacterRef};

/// Turns a killing blow into experience
///
/// A killer in a party hands the kill to every member standing with them
/// (themself included) as a proxied event, so each one is credited exactly
/// once and nobody is credited twice.
pub struct DeathblowAttribution {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
    emitter: Arc<dyn EventEmitterPort>,
    experience: Arc<dyn ExperienceCurvePort>,
    party: PartyBroadcaster,
}

impl DeathblowAttribution {
    pub fn new(ports: &CombatPorts) -> Self {
        Self {
            world: Arc::clone(&ports.world),
            sessions: Arc::clone(&ports.sessions),
            emitter: Arc::clone(&ports.emitter),
            experience: Arc::clone(&ports.experience),
            party: ports.party_broadcaster(),
        }
    }

    pub fn deathblow(
        &self,
        actor: CharacterId,
        target: &CharacterRef,
        target_level: u32,
        skip_party: bool,
    ) -> Result<(), CombatEventError> {
        let killer = load_character(self.world.as_ref(), actor)?;
        let reward = self.experience.mob_exp(target_level);

        if !skip_party {
            if let Some(members) = self.party.members_with(&killer) {
                debug!(killer = %actor, members = members.len(), "Sharing kill with party");
                for member in members {
                    self.emitter.emit(
                        member,
                        CombatEvent::Deathblow {
                            target: target.clone(),
                            target_level,
                            skip_party: true,
                        },
                    );
                }
                return Ok(());
            }
        }

        if !killer.is_npc {
            self.sessions.say(
                actor,
                &format!("<b><red>You killed {}!</red></b>", target.name),
            );
        }
        self.emitter
            .emit(actor, CombatEvent::Experience { amount: reward });
        Ok(())
    }
}

#[async_trait]
impl CombatListener for DeathblowAttribution {
    async fn on_event(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        match event {
            CombatEvent::Deathblow {
                target,
                target_level,
                skip_party,
            } => self.deathblow(actor, target, *target_level, *skip_party),
            _ => Ok(()),
        }
    }
}
