//! Effect events - Damage and Heal payloads produced by the combat engine
//!
//! An effect describes one completed combat action. The engine has already
//! applied it by the time it reaches this crate; the post-mitigation magnitude
//! travels next to the effect as `final_amount`.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, ItemId};

/// Name of the primary health pool
pub const HEALTH: &str = "health";

/// Lightweight reference to a character as captured when the event was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    pub id: CharacterId,
    pub name: String,
}

impl CharacterRef {
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Proximate cause of an effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectSource {
    /// A character acting bare-handed
    Character(CharacterRef),
    /// A weapon, potion or other item
    Item { id: ItemId, name: String },
    /// A skill or spell
    Skill { name: String },
}

impl EffectSource {
    pub fn name(&self) -> &str {
        match self {
            EffectSource::Character(character) => &character.name,
            EffectSource::Item { name, .. } => name,
            EffectSource::Skill { name } => name,
        }
    }

    /// Whether this source is the given character itself
    pub fn is_character(&self, id: CharacterId) -> bool {
        matches!(self, EffectSource::Character(character) if character.id == id)
    }
}

/// Presentation flags carried by an effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectMetadata {
    /// Suppress all narration
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub critical: bool,
}

/// A damage or heal payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Attribute pool affected (`health`, `mana`, ...)
    pub attribute: String,
    /// Magnitude before mitigation
    pub amount: i32,
    pub source: Option<EffectSource>,
    /// Character who initiated the effect; absent for environmental effects
    pub attacker: Option<CharacterRef>,
    pub target: CharacterRef,
    #[serde(default)]
    pub metadata: EffectMetadata,
}

pub type Damage = Effect;
pub type Heal = Effect;

/// Builders for effects made in-process; the engine's arrive deserialized
#[cfg(test)]
impl Effect {
    pub fn new(attribute: impl Into<String>, amount: i32, target: CharacterRef) -> Self {
        Self {
            attribute: attribute.into(),
            amount,
            source: None,
            attacker: None,
            target,
            metadata: EffectMetadata::default(),
        }
    }

    /// Character-initiated effect whose source is the attacker itself
    pub fn by(mut self, attacker: CharacterRef) -> Self {
        self.source = Some(EffectSource::Character(attacker.clone()));
        self.attacker = Some(attacker);
        self
    }

    pub fn with_attacker(mut self, attacker: CharacterRef) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn with_source(mut self, source: EffectSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn critical(mut self) -> Self {
        self.metadata.critical = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.metadata.hidden = true;
        self
    }
}

impl Effect {
    pub fn is_health(&self) -> bool {
        self.attribute == HEALTH
    }

    /// Whether the proximate source is the attacker itself
    ///
    /// Both absent counts as the same (an unattributed, sourceless effect).
    pub fn source_is_attacker(&self) -> bool {
        match (&self.source, &self.attacker) {
            (None, None) => true,
            (Some(source), Some(attacker)) => source.is_character(attacker.id),
            _ => false,
        }
    }

    /// Whether the proximate source is the given character (or absent)
    pub fn source_is(&self, id: CharacterId) -> bool {
        self.source
            .as_ref()
            .map_or(true, |source| source.is_character(id))
    }

    pub fn attacker_is(&self, id: CharacterId) -> bool {
        self.attacker.as_ref().is_some_and(|attacker| attacker.id == id)
    }
}
