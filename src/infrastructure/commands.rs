//! Player command dispatch
//!
//! Only the commands the server itself needs to run on a player's behalf
//! live here; `look` re-renders the player's surroundings.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::outbound::{
    CommandError, CommandPort, SessionPort, WorldStatePort,
};
use crate::domain::value_objects::CharacterId;

pub struct CommandManager {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
}

impl CommandManager {
    pub fn new(world: Arc<dyn WorldStatePort>, sessions: Arc<dyn SessionPort>) -> Self {
        Self { world, sessions }
    }

    fn look(&self, actor: CharacterId) -> Result<(), CommandError> {
        let failed = |reason: &str| CommandError::Failed {
            command: "look".to_string(),
            reason: reason.to_string(),
        };

        let character = self
            .world
            .character(actor)
            .ok_or_else(|| failed("character is not in the world"))?;
        let room_ref = character
            .room
            .as_ref()
            .ok_or_else(|| failed("character is nowhere"))?;
        let room = self
            .world
            .room(room_ref)
            .ok_or_else(|| failed("room does not exist"))?;

        self.sessions
            .say(actor, &format!("<b><yellow>{}</yellow></b>", room.title));
        if !room.description.is_empty() {
            self.sessions.say(actor, &room.description);
        }

        for occupant in self.world.occupants(room_ref) {
            if occupant == actor {
                continue;
            }
            if let Some(other) = self.world.character(occupant) {
                let tag = if other.is_npc { "[NPC]" } else { "[Player]" };
                self.sessions.say(actor, &format!("{tag} {}", other.name));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommandPort for CommandManager {
    async fn execute(
        &self,
        command: &str,
        args: &str,
        actor: CharacterId,
    ) -> Result<(), CommandError> {
        debug!(actor = %actor, command, args, "Executing command");
        match command {
            "look" => self.look(actor),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
