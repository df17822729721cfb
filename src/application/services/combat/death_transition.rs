//! Player death and respawn - `killed`
//!
//! The flow runs in two phases around the relocation await point:
//!
//! 1. Before moving: drop the combat prompt, announce the death, restore
//!    health and clear the dying mark so the player never arrives dead.
//! 2. After arriving: look around, report the killer, take the experience
//!    penalty and persist.
//!
//! The penalty is only applied once relocation has completed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use super::{
    load_character, CombatConfig, CombatEventError, CombatListener, CombatPorts, PartyBroadcaster,
};
use crate::application::ports::outbound::{
    CharacterPersistencePort, CommandPort, MovementPort, SessionPort, WorldStatePort,
    COMBAT_PROMPT,
};
use crate::domain::entities::{Character, HOME_WAYPOINT};
use crate::domain::events::CombatEvent;
use crate::domain::value_objects::{CharacterId, CharacterRef, RoomRef, HEALTH};

/// Share of current experience lost on death, as a divisor (20%)
const DEATH_PENALTY_DIVISOR: u64 = 5;

pub struct DeathTransition {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
    movement: Arc<dyn MovementPort>,
    commands: Arc<dyn CommandPort>,
    persistence: Arc<dyn CharacterPersistencePort>,
    party: PartyBroadcaster,
    starting_room: Option<RoomRef>,
}

impl DeathTransition {
    pub fn new(ports: &CombatPorts, config: &CombatConfig) -> Self {
        if config.starting_room.is_none() {
            error!("No starting room configured, players without a home waypoint cannot respawn");
        }

        Self {
            world: Arc::clone(&ports.world),
            sessions: Arc::clone(&ports.sessions),
            movement: Arc::clone(&ports.movement),
            commands: Arc::clone(&ports.commands),
            persistence: Arc::clone(&ports.persistence),
            party: ports.party_broadcaster(),
            starting_room: config.starting_room.clone(),
        }
    }

    #[instrument(skip(self, killer), fields(killer = ?killer.map(|k| k.id)))]
    pub async fn killed(
        &self,
        victim: CharacterId,
        killer: Option<&CharacterRef>,
    ) -> Result<(), CombatEventError> {
        let character = load_character(self.world.as_ref(), victim)?;
        if character.is_npc {
            // NPC corpses and respawns belong to the area
            return Ok(());
        }
        if !character.dying && character.health() > 0 {
            debug!(victim = %victim, "Already respawned, ignoring duplicate death");
            return Ok(());
        }

        self.sessions.remove_prompt(victim, COMBAT_PROMPT);
        self.announce_death(&character, killer);
        self.party.notify_party(
            &character,
            &format!("<b><green>{} was killed!</green></b>", character.name),
        );

        self.world.modify_character(victim, &mut |c| {
            c.set_attribute_to_max(HEALTH);
            c.dying = false;
        })?;

        let Some(destination) = self.respawn_room(&character) else {
            error!(victim = %victim, "No respawn room resolves, leaving character in place");
            return Err(CombatEventError::NoRespawnRoom(victim));
        };

        self.movement.move_to(victim, &destination).await?;
        info!(victim = %victim, room = %destination, "Character respawned");

        if let Err(e) = self.commands.execute("look", "", victim).await {
            warn!(victim = %victim, error = %e, "Failed to look after respawn");
        }

        self.sessions.say(victim, "<b><red>Whoops, that sucked!</red></b>");
        if let Some(killer) = killer.filter(|killer| killer.id != victim) {
            self.sessions
                .say(victim, &format!("You were killed by {}.", killer.name));
        }

        let lost = self.apply_penalty(victim).await?;
        self.sessions.say(
            victim,
            &format!("<red>You lose <b>{lost}</b> experience!</red>"),
        );
        self.sessions.show_prompt(victim);
        Ok(())
    }

    /// Tell everyone else in the room, the killer excepted
    fn announce_death(&self, victim: &Character, killer: Option<&CharacterRef>) {
        let Some(room) = &victim.room else {
            return;
        };

        let message = match killer {
            Some(killer) => format!(
                "<b><red>{} collapses to the ground, dead at the hands of {}.</red></b>",
                victim.name, killer.name
            ),
            None => format!(
                "<b><red>{} collapses to the ground, dead.</red></b>",
                victim.name
            ),
        };

        for occupant in self.world.occupants(room) {
            if occupant == victim.id || killer.is_some_and(|killer| killer.id == occupant) {
                continue;
            }
            self.sessions.say(occupant, &message);
        }
    }

    /// Home waypoint if it names a known room, else the starting room
    fn respawn_room(&self, victim: &Character) -> Option<RoomRef> {
        let home = victim
            .get_meta(HOME_WAYPOINT)
            .map(RoomRef::from)
            .filter(|room| self.world.room(room).is_some());

        home.or_else(|| {
            self.starting_room
                .clone()
                .filter(|room| self.world.room(room).is_some())
        })
    }

    /// Deduct the death penalty from current experience and save
    ///
    /// # Returns
    ///
    /// The amount of experience lost
    async fn apply_penalty(&self, victim: CharacterId) -> Result<u64, CombatEventError> {
        let mut lost = 0;
        self.world.modify_character(victim, &mut |c| {
            lost = c.experience / DEATH_PENALTY_DIVISOR;
            c.experience -= lost;
        })?;

        let character = load_character(self.world.as_ref(), victim)?;
        self.persistence
            .save(&character)
            .await
            .map_err(|e| CombatEventError::Persistence(format!("{e:#}")))?;

        Ok(lost)
    }
}

#[async_trait]
impl CombatListener for DeathTransition {
    async fn on_event(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        match event {
            CombatEvent::Killed { killer } => self.killed(actor, killer.as_ref()).await,
            _ => Ok(()),
        }
    }
}
