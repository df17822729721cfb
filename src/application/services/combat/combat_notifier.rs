//! Effect narration - `hit`, `heal`, `damaged` and `healed`
//!
//! Each handler is a stateless reaction to an effect the engine has already
//! applied. The only downstream consequence is the death trigger in
//! [`CombatNotifier::damaged`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::message_formatter as fmt;
use super::{load_character, CombatEventError, CombatListener, CombatPorts, PartyBroadcaster};
use crate::application::ports::outbound::{
    EventEmitterPort, ItemEventPort, SessionPort, WorldStatePort,
};
use crate::domain::entities::WIELD_SLOT;
use crate::domain::events::{CombatEvent, ItemHit};
use crate::domain::value_objects::{CharacterId, CharacterRef, Damage, Heal};

pub struct CombatNotifier {
    world: Arc<dyn WorldStatePort>,
    sessions: Arc<dyn SessionPort>,
    items: Arc<dyn ItemEventPort>,
    emitter: Arc<dyn EventEmitterPort>,
    party: PartyBroadcaster,
}

impl CombatNotifier {
    pub fn new(ports: &CombatPorts) -> Self {
        Self {
            world: Arc::clone(&ports.world),
            sessions: Arc::clone(&ports.sessions),
            items: Arc::clone(&ports.items),
            emitter: Arc::clone(&ports.emitter),
            party: ports.party_broadcaster(),
        }
    }

    /// The actor dealt damage
    pub fn hit(
        &self,
        actor: CharacterId,
        damage: &Damage,
        target: &CharacterRef,
        final_amount: i32,
    ) -> Result<(), CombatEventError> {
        if damage.metadata.hidden {
            return Ok(());
        }
        let attacker = load_character(self.world.as_ref(), actor)?;

        self.sessions.say(
            actor,
            &fmt::hit_for_attacker(damage, actor, target, final_amount),
        );

        if let Some(weapon) = attacker.equipped(WIELD_SLOT) {
            self.items.item_hit(ItemHit {
                item: weapon.id,
                wielder: actor,
                damage: damage.clone(),
                target: target.clone(),
                final_amount,
            });
        }

        let attacker_ref = attacker.to_ref();
        self.party.broadcast(&attacker, |_| {
            fmt::hit_for_party(damage, &attacker_ref, target, final_amount)
        });
        Ok(())
    }

    /// The actor healed someone, possibly themself
    pub fn heal(
        &self,
        actor: CharacterId,
        heal: &Heal,
        target: &CharacterRef,
        final_amount: i32,
    ) -> Result<(), CombatEventError> {
        if heal.metadata.hidden {
            return Ok(());
        }
        let caster = load_character(self.world.as_ref(), actor)?;

        if target.id != actor {
            self.sessions.say(
                actor,
                &fmt::heal_for_caster(heal, actor, target, final_amount),
            );
        }

        // Party members witness self-heals too
        let caster_ref = caster.to_ref();
        self.party.broadcast(&caster, |_| {
            fmt::heal_for_party(heal, &caster_ref, target, final_amount)
        });
        Ok(())
    }

    /// The actor took damage
    ///
    /// Only the health pool is narrated. When the hit leaves the victim at or
    /// below zero health the death transition is started: the victim leaves
    /// combat, `killed` is emitted on the victim and `deathblow` on the
    /// attacker. Only the first fatal blow does this; the victim stays marked
    /// dying until `killed` has run.
    pub fn damaged(
        &self,
        actor: CharacterId,
        damage: &Damage,
        final_amount: i32,
    ) -> Result<(), CombatEventError> {
        if damage.metadata.hidden || !damage.is_health() {
            return Ok(());
        }
        let victim = load_character(self.world.as_ref(), actor)?;
        let victim_ref = victim.to_ref();

        self.sessions
            .say(actor, &fmt::damaged_for_victim(damage, final_amount));
        self.party.broadcast(&victim, |_| {
            fmt::damaged_for_party(damage, &victim_ref, final_amount)
        });

        if victim.health() > 0 {
            return Ok(());
        }

        // Later blows in the same round must not start a second death
        let mut first_blow = false;
        self.world.modify_character(actor, &mut |c| {
            first_blow = !c.dying;
            c.dying = true;
        })?;
        if !first_blow {
            debug!(victim = %actor, "Already dying, ignoring fatal damage");
            return Ok(());
        }

        info!(
            victim = %victim.id,
            killer = ?damage.attacker.as_ref().map(|attacker| attacker.id),
            "Character died"
        );
        self.world.disengage(actor)?;
        self.emitter.emit(
            actor,
            CombatEvent::Killed {
                killer: damage.attacker.clone(),
            },
        );

        match &damage.attacker {
            Some(attacker) if attacker.id != actor => self.emitter.emit(
                attacker.id,
                CombatEvent::Deathblow {
                    target: victim_ref,
                    target_level: victim.level,
                    skip_party: false,
                },
            ),
            _ => debug!(victim = %actor, "No one to credit for the kill"),
        }
        Ok(())
    }

    /// The actor was healed
    pub fn healed(
        &self,
        actor: CharacterId,
        heal: &Heal,
        final_amount: i32,
    ) -> Result<(), CombatEventError> {
        if heal.metadata.hidden {
            return Ok(());
        }
        let recipient = load_character(self.world.as_ref(), actor)?;

        self.sessions.say(
            actor,
            &fmt::healed_for_recipient(heal, actor, final_amount),
        );

        // Restoring a secondary pool stays private
        if !heal.is_health() {
            return Ok(());
        }
        let recipient_ref = recipient.to_ref();
        self.party.broadcast(&recipient, |_| {
            fmt::healed_for_party(heal, &recipient_ref, final_amount)
        });
        Ok(())
    }
}

#[async_trait]
impl CombatListener for CombatNotifier {
    async fn on_event(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        match event {
            CombatEvent::Hit {
                damage,
                target,
                final_amount,
            } => self.hit(actor, damage, target, *final_amount),
            CombatEvent::Heal {
                heal,
                target,
                final_amount,
            } => self.heal(actor, heal, target, *final_amount),
            CombatEvent::Damaged {
                damage,
                final_amount,
            } => self.damaged(actor, damage, *final_amount),
            CombatEvent::Healed { heal, final_amount } => {
                self.healed(actor, heal, *final_amount)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::combat::test_support::Fixture;
    use crate::domain::entities::EquippedItem;
    use crate::domain::value_objects::{EffectSource, ItemId, HEALTH};

    fn notifier(fx: &Fixture) -> CombatNotifier {
        CombatNotifier::new(&fx.ports())
    }

    fn reference(fx: &Fixture, id: CharacterId) -> CharacterRef {
        fx.world.character(id).unwrap().to_ref()
    }

    #[test]
    fn test_hit_narrates_and_forwards_to_weapon() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        let rat = fx.npc("Rat", "limbo:white", 12, 12);
        fx.party(&[hero, cleric]);
        let sword = EquippedItem {
            id: ItemId::new(),
            name: "Sword".to_string(),
        };
        let sword_id = sword.id;
        fx.world
            .modify_character(hero, &mut |c| {
                c.equipment.insert(WIELD_SLOT.to_string(), sword.clone());
            })
            .unwrap();

        let rat_ref = reference(&fx, rat);
        let damage = Damage::new(HEALTH, 9, rat_ref.clone()).by(reference(&fx, hero));
        notifier(&fx).hit(hero, &damage, &rat_ref, 8).unwrap();

        assert_eq!(
            fx.sessions.said_to(hero),
            vec!["You hit <b>Rat</b> for <b>8</b> damage."]
        );
        assert_eq!(
            fx.sessions.said_to(cleric),
            vec!["Hero hit <b>Rat</b> for <b>8</b> damage."]
        );

        let forwarded = fx.items.hits();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].item, sword_id);
        assert_eq!(forwarded[0].final_amount, 8);
    }

    #[test]
    fn test_hit_critical_marks_only_actor_line() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        let rat = fx.npc("Rat", "limbo:white", 12, 12);
        fx.party(&[hero, cleric]);

        let rat_ref = reference(&fx, rat);
        let damage = Damage::new(HEALTH, 9, rat_ref.clone())
            .by(reference(&fx, hero))
            .critical();
        notifier(&fx).hit(hero, &damage, &rat_ref, 18).unwrap();

        assert!(fx.sessions.said_to(hero)[0].contains(fmt::CRITICAL_MARKER));
        assert!(!fx.sessions.said_to(cleric)[0].contains("Critical"));
        assert!(fx.items.hits().is_empty());
    }

    #[test]
    fn test_hidden_effects_are_silent() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        fx.party(&[hero, cleric]);
        let hero_ref = reference(&fx, hero);
        let cleric_ref = reference(&fx, cleric);
        let notifier = notifier(&fx);

        let damage = Damage::new(HEALTH, 5, hero_ref.clone())
            .by(cleric_ref.clone())
            .hidden();
        let heal = Heal::new(HEALTH, 5, hero_ref.clone())
            .by(cleric_ref.clone())
            .hidden();

        notifier.hit(cleric, &damage, &hero_ref, 5).unwrap();
        notifier.damaged(hero, &damage, 5).unwrap();
        notifier.heal(cleric, &heal, &hero_ref, 5).unwrap();
        notifier.healed(hero, &heal, 5).unwrap();

        assert!(fx.sessions.said_to(hero).is_empty());
        assert!(fx.sessions.said_to(cleric).is_empty());
    }

    #[test]
    fn test_self_heal_is_still_broadcast() {
        let fx = Fixture::new();
        let cleric = fx.player("Cleric", "limbo:white");
        let hero = fx.player("Hero", "limbo:white");
        fx.party(&[cleric, hero]);

        let cleric_ref = reference(&fx, cleric);
        let heal = Heal::new(HEALTH, 10, cleric_ref.clone()).by(cleric_ref.clone());
        notifier(&fx).heal(cleric, &heal, &cleric_ref, 10).unwrap();

        assert!(fx.sessions.said_to(cleric).is_empty());
        assert_eq!(
            fx.sessions.said_to(hero),
            vec!["Cleric healed <b>Cleric</b> for <b><green>10</green></b> health."]
        );
    }

    #[test]
    fn test_damaged_secondary_pool_is_not_narrated() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        fx.party(&[hero, cleric]);

        let drain = Damage::new("mana", 20, reference(&fx, hero)).by(reference(&fx, cleric));
        notifier(&fx).damaged(hero, &drain, 20).unwrap();

        assert!(fx.sessions.said_to(hero).is_empty());
        assert!(fx.sessions.said_to(cleric).is_empty());
        assert!(fx.emitter.emitted().is_empty());
    }

    #[test]
    fn test_damaged_at_zero_health_starts_death() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let bandit = fx.player("Bandit", "limbo:white");
        fx.engage(hero, bandit);
        fx.set_health(hero, 0);

        let hero_ref = reference(&fx, hero);
        let bandit_ref = reference(&fx, bandit);
        let damage = Damage::new(HEALTH, 30, hero_ref.clone()).by(bandit_ref.clone());
        notifier(&fx).damaged(hero, &damage, 30).unwrap();

        assert!(!fx.world.character(hero).unwrap().is_in_combat());
        assert!(!fx.world.character(bandit).unwrap().is_in_combat());
        assert_eq!(
            fx.emitter.emitted(),
            vec![
                (
                    hero,
                    CombatEvent::Killed {
                        killer: Some(bandit_ref)
                    }
                ),
                (
                    bandit,
                    CombatEvent::Deathblow {
                        target: hero_ref,
                        target_level: 5,
                        skip_party: false
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_later_fatal_blows_are_only_narrated() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let bandit = fx.player("Bandit", "limbo:white");
        let archer = fx.npc("Archer", "limbo:white", 20, 20);
        fx.set_health(hero, -5);

        let hero_ref = reference(&fx, hero);
        let slash = Damage::new(HEALTH, 9, hero_ref.clone()).by(reference(&fx, bandit));
        let arrow = Damage::new(HEALTH, 4, hero_ref).by(reference(&fx, archer));
        let notifier = notifier(&fx);

        notifier.damaged(hero, &slash, 9).unwrap();
        fx.emitter.take();
        notifier.damaged(hero, &arrow, 4).unwrap();

        assert!(fx.world.character(hero).unwrap().dying);
        assert!(fx.emitter.emitted().is_empty());
        assert_eq!(fx.sessions.said_to(hero).len(), 2);
    }

    #[test]
    fn test_damaged_without_attacker_credits_no_one() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        fx.set_health(hero, -3);

        let poison = Damage::new(HEALTH, 4, reference(&fx, hero)).with_source(
            EffectSource::Skill {
                name: "Poison".to_string(),
            },
        );
        notifier(&fx).damaged(hero, &poison, 4).unwrap();

        assert_eq!(
            fx.emitter.emitted(),
            vec![(hero, CombatEvent::Killed { killer: None })]
        );
    }

    #[test]
    fn test_healed_broadcasts_only_health() {
        let fx = Fixture::new();
        let hero = fx.player("Hero", "limbo:white");
        let cleric = fx.player("Cleric", "limbo:white");
        fx.party(&[hero, cleric]);
        let hero_ref = reference(&fx, hero);
        let cleric_ref = reference(&fx, cleric);
        let notifier = notifier(&fx);

        let mana = Heal::new("mana", 7, hero_ref.clone()).by(cleric_ref.clone());
        notifier.healed(hero, &mana, 7).unwrap();
        assert_eq!(
            fx.sessions.said_to(hero),
            vec!["<b>Cleric</b> restores <b>7</b> mana."]
        );
        assert!(fx.sessions.said_to(cleric).is_empty());

        let health = Heal::new(HEALTH, 12, hero_ref).by(cleric_ref);
        notifier.healed(hero, &health, 12).unwrap();
        assert_eq!(
            fx.sessions.said_to(cleric),
            vec!["<b>Cleric</b> heals Hero for <b><red>12</red></b>."]
        );
    }
}
