//! Combat narration
//!
//! Pure functions turning an effect and a point of view into a line of
//! markup. Tags (`<b>`, `<red>`, `<green>`) are interpreted by the transport.
//!
//! Three points of view exist for every effect: the character who caused it,
//! the character it landed on, and a party member watching either of them.

use crate::domain::value_objects::{CharacterId, CharacterRef, Damage, Effect, Heal};

/// Emphasis appended to the actor's own line for critical effects
pub const CRITICAL_MARKER: &str = " <red><b>(Critical)</b></red>";

fn critical_suffix(effect: &Effect) -> &'static str {
    if effect.metadata.critical {
        CRITICAL_MARKER
    } else {
        ""
    }
}

fn source_name(effect: &Effect) -> &str {
    effect.source.as_ref().map_or("", |source| source.name())
}

/// Who (and with what) an effect was dealt, as seen by the receiving side
///
/// `<b>Rat</b>`, `<b>Bandit</b>'s <b>Dagger</b>`, `<b>Poison</b>` or
/// `Something` when neither an attacker nor a source is known.
fn attacker_clause(effect: &Effect) -> String {
    match (&effect.attacker, &effect.source) {
        (Some(attacker), _) if effect.source_is_attacker() => format!("<b>{}</b>", attacker.name),
        (Some(attacker), Some(source)) => {
            format!("<b>{}</b>'s <b>{}</b>", attacker.name, source.name())
        }
        (Some(attacker), None) => format!("<b>{}</b>", attacker.name),
        (None, Some(source)) => format!("<b>{}</b>", source.name()),
        (None, None) => "Something".to_string(),
    }
}

/// `hit` as seen by the attacker
pub fn hit_for_attacker(
    damage: &Damage,
    viewer: CharacterId,
    target: &CharacterRef,
    amount: i32,
) -> String {
    let actor = if damage.source_is(viewer) {
        "You hit".to_string()
    } else {
        format!("Your <b>{}</b> hit", source_name(damage))
    };

    format!(
        "{actor} <b>{}</b> for <b>{amount}</b> damage.{}",
        target.name,
        critical_suffix(damage)
    )
}

/// `hit` as seen by the attacker's party
pub fn hit_for_party(
    damage: &Damage,
    attacker: &CharacterRef,
    target: &CharacterRef,
    amount: i32,
) -> String {
    let actor = if damage.source_is(attacker.id) {
        format!("{} hit", attacker.name)
    } else {
        format!("{}'s <b>{}</b> hit", attacker.name, source_name(damage))
    };

    format!("{actor} <b>{}</b> for <b>{amount}</b> damage.", target.name)
}

/// `heal` as seen by the caster, only used when healing someone else
pub fn heal_for_caster(
    heal: &Heal,
    viewer: CharacterId,
    target: &CharacterRef,
    amount: i32,
) -> String {
    let actor = if heal.source_is(viewer) {
        "You heal".to_string()
    } else {
        format!("Your <b>{}</b> healed", source_name(heal))
    };

    format!(
        "{actor} <b>{}</b> for <b><green>{amount}</green></b> {}.",
        target.name, heal.attribute
    )
}

/// `heal` as seen by the caster's party
pub fn heal_for_party(
    heal: &Heal,
    caster: &CharacterRef,
    target: &CharacterRef,
    amount: i32,
) -> String {
    let actor = if heal.source_is(caster.id) {
        format!("{} healed", caster.name)
    } else {
        format!("{}'s <b>{}</b> healed", caster.name, source_name(heal))
    };

    format!(
        "{actor} <b>{}</b> for <b><green>{amount}</green></b> {}.",
        target.name, heal.attribute
    )
}

/// `damaged` as seen by the victim
pub fn damaged_for_victim(damage: &Damage, amount: i32) -> String {
    format!(
        "{} hit <b>You</b> for <b><red>{amount}</red></b> damage.{}",
        attacker_clause(damage),
        critical_suffix(damage)
    )
}

/// `damaged` as seen by the victim's party
pub fn damaged_for_party(damage: &Damage, victim: &CharacterRef, amount: i32) -> String {
    format!(
        "{} hit <b>{}</b> for <b><red>{amount}</red></b> damage.",
        attacker_clause(damage),
        victim.name
    )
}

/// `healed` as seen by the recipient
pub fn healed_for_recipient(heal: &Heal, recipient: CharacterId, amount: i32) -> String {
    let own_heal = heal.attacker_is(recipient);

    if own_heal && heal.source_is(recipient) {
        return if heal.is_health() {
            format!("You heal yourself for <b><red>{amount}</red></b>.")
        } else {
            format!("You restore <b>{amount}</b> {}.", heal.attribute)
        };
    }

    let subject = if own_heal {
        format!("Your <b>{}</b>", source_name(heal))
    } else {
        attacker_clause(heal)
    };

    if heal.is_health() {
        format!("{subject} heals you for <b><red>{amount}</red></b>.")
    } else {
        format!("{subject} restores <b>{amount}</b> {}.", heal.attribute)
    }
}

/// `healed` as seen by the recipient's party (health only)
///
/// Worded unlike [`heal_for_party`]: red amount, no attribute name. Players
/// see both lines for one heal, so they are kept distinct.
pub fn healed_for_party(heal: &Heal, recipient: &CharacterRef, amount: i32) -> String {
    format!(
        "{} heals {} for <b><red>{amount}</red></b>.",
        attacker_clause(heal),
        recipient.name
    )
}
