//! Party fan-out of combat narration

use std::sync::Arc;

use crate::application::ports::outbound::{SessionPort, WorldStatePort};
use crate::domain::entities::Character;
use crate::domain::value_objects::CharacterId;

/// Sends narration to an actor's party members
#[derive(Clone)]
pub struct PartyBroadcaster {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
}

impl PartyBroadcaster {
    pub fn new(world: Arc<dyn WorldStatePort>, sessions: Arc<dyn SessionPort>) -> Self {
        Self { world, sessions }
    }

    /// Send a per-member message to every party member in the actor's room
    ///
    /// The actor never receives its own broadcast. Members are visited in
    /// party order.
    pub fn broadcast<F>(&self, actor: &Character, mut message_for: F)
    where
        F: FnMut(&Character) -> String,
    {
        let Some(party) = actor.party.and_then(|id| self.world.party(id)) else {
            return;
        };

        for member_id in party.members {
            if member_id == actor.id {
                continue;
            }
            let Some(member) = self.world.character(member_id) else {
                continue;
            };
            if !member.is_colocated_with(actor) {
                continue;
            }

            let message = message_for(&member);
            self.sessions.say(member.id, &message);
        }
    }

    /// Send the same message to the whole party, wherever they are
    pub fn notify_party(&self, actor: &Character, message: &str) {
        let Some(party) = actor.party.and_then(|id| self.world.party(id)) else {
            return;
        };

        for member_id in party.members {
            self.sessions.say(member_id, message);
        }
    }

    /// Party members standing with the actor, the actor included
    ///
    /// `None` when the actor isn't in a known party.
    pub fn members_with(&self, actor: &Character) -> Option<Vec<CharacterId>> {
        let party = actor.party.and_then(|id| self.world.party(id))?;

        let members = party
            .members
            .into_iter()
            .filter(|member_id| {
                *member_id == actor.id
                    || self
                        .world
                        .character(*member_id)
                        .is_some_and(|member| member.is_colocated_with(actor))
            })
            .collect();

        Some(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::combat::test_support::Fixture;

    #[test]
    fn test_broadcast_skips_actor_and_other_rooms() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        let scout = fx.player("Scout", "limbo:black");
        fx.party(&[hero, cleric, scout]);

        let actor = fx.world.character(hero).unwrap();
        fx.broadcaster()
            .broadcast(&actor, |member| format!("hello {}", member.name));

        assert_eq!(fx.sessions.said_to(cleric), vec!["hello Cleric"]);
        assert!(fx.sessions.said_to(hero).is_empty());
        assert!(fx.sessions.said_to(scout).is_empty());
    }

    #[test]
    fn test_broadcast_without_party_is_silent() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let bystander = fx.player("Bystander", "limbo:white");

        let actor = fx.world.character(hero).unwrap();
        fx.broadcaster().broadcast(&actor, |_| "hello".to_string());

        assert!(fx.sessions.said_to(bystander).is_empty());
    }

    #[test]
    fn test_notify_party_reaches_every_room() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let scout = fx.player("Scout", "limbo:black");
        fx.party(&[hero, scout]);

        let actor = fx.world.character(hero).unwrap();
        fx.broadcaster().notify_party(&actor, "news");

        assert_eq!(fx.sessions.said_to(hero), vec!["news"]);
        assert_eq!(fx.sessions.said_to(scout), vec!["news"]);
    }

    #[test]
    fn test_members_with_includes_actor() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        let scout = fx.player("Scout", "limbo:black");
        fx.party(&[hero, cleric, scout]);

        let actor = fx.world.character(hero).unwrap();
        assert_eq!(
            fx.broadcaster().members_with(&actor),
            Some(vec![hero, cleric])
        );

        let loner = fx.world.character(fx.player("Loner", "limbo:white")).unwrap();
        assert_eq!(fx.broadcaster().members_with(&loner), None);
    }
}
