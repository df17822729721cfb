//! Character entity - Players and NPCs that can fight, die and respawn

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, CharacterRef, ItemId, PartyId, RoomRef, HEALTH};

/// Equipment slot holding the wielded weapon
pub const WIELD_SLOT: &str = "wield";

/// Metadata key of the player's bound respawn room
pub const HOME_WAYPOINT: &str = "waypoint.home";

/// A character in the world
///
/// `room`, `party` and `combatants` are references into registries owned by
/// the world; a character never owns the entities it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    pub is_npc: bool,

    pub room: Option<RoomRef>,
    pub party: Option<PartyId>,
    /// Characters currently fighting this one, in engagement order
    #[serde(default)]
    pub combatants: Vec<CharacterId>,
    /// Set by the killing blow, cleared once the death has been handled
    #[serde(default)]
    pub dying: bool,

    #[serde(default)]
    pub attributes: AttributeSet,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Map of slot name to equipped item
    #[serde(default)]
    pub equipment: BTreeMap<String, EquippedItem>,
    #[serde(default)]
    pub experience: u64,
}

impl Character {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            level,
            is_npc: false,
            room: None,
            party: None,
            combatants: Vec::new(),
            dying: false,
            attributes: AttributeSet::default(),
            metadata: BTreeMap::new(),
            equipment: BTreeMap::new(),
            experience: 0,
        }
    }

    pub fn npc(name: impl Into<String>, level: u32) -> Self {
        Self {
            is_npc: true,
            ..Self::new(name, level)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, current: i32, max: i32) -> Self {
        self.attributes.insert(name, Attribute::new(current, max));
        self
    }

    pub fn with_room(mut self, room: RoomRef) -> Self {
        self.room = Some(room);
        self
    }

    pub fn to_ref(&self) -> CharacterRef {
        CharacterRef::new(self.id, self.name.clone())
    }

    pub fn is_in_combat(&self) -> bool {
        !self.combatants.is_empty()
    }

    pub fn add_combatant(&mut self, other: CharacterId) {
        if other != self.id && !self.combatants.contains(&other) {
            self.combatants.push(other);
        }
    }

    pub fn remove_combatant(&mut self, other: CharacterId) {
        self.combatants.retain(|id| *id != other);
    }

    /// Current value of an attribute, 0 if the character doesn't have it
    pub fn get_attribute(&self, name: &str) -> i32 {
        self.attributes.get(name).map_or(0, |a| a.current)
    }

    pub fn get_max_attribute(&self, name: &str) -> i32 {
        self.attributes.get(name).map_or(0, |a| a.max)
    }

    pub fn set_attribute(&mut self, name: &str, value: i32) {
        if let Some(attribute) = self.attributes.get_mut(name) {
            attribute.current = value;
        }
    }

    pub fn set_attribute_to_max(&mut self, name: &str) {
        if let Some(attribute) = self.attributes.get_mut(name) {
            attribute.current = attribute.max;
        }
    }

    pub fn health(&self) -> i32 {
        self.get_attribute(HEALTH)
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn equipped(&self, slot: &str) -> Option<&EquippedItem> {
        self.equipment.get(slot)
    }

    /// Whether the given character shares this character's room
    pub fn is_colocated_with(&self, other: &Character) -> bool {
        self.room.is_some() && self.room == other.room
    }
}

/// An item occupying an equipment slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub id: ItemId,
    pub name: String,
}

/// A numeric attribute pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub current: i32,
    pub max: i32,
}

impl Attribute {
    pub fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }
}

/// Named attribute pools (`health`, `mana`, `stamina`, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, Attribute>);

impl AttributeSet {
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.0.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.0.insert(name.into(), attribute);
    }
}
