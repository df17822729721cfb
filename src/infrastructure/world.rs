//! In-memory world registry
//!
//! The authoritative owner of rooms, parties and characters for a running
//! server. Everything else holds ids and resolves them here.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::outbound::{MovementPort, WorldError, WorldStatePort};
use crate::domain::entities::{Character, Party, Room};
use crate::domain::value_objects::{CharacterId, PartyId, RoomRef};

/// Initial world contents, as stored in the world file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorldSeed {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub characters: Vec<Character>,
}

#[derive(Default)]
struct WorldState {
    rooms: HashMap<RoomRef, Room>,
    parties: HashMap<PartyId, Party>,
    characters: HashMap<CharacterId, Character>,
    /// Room occupants in arrival order
    occupancy: HashMap<RoomRef, Vec<CharacterId>>,
}

impl WorldState {
    fn leave_room(&mut self, id: CharacterId, room: &RoomRef) {
        if let Some(occupants) = self.occupancy.get_mut(room) {
            occupants.retain(|occupant| *occupant != id);
        }
    }

    fn enter_room(&mut self, id: CharacterId, room: &RoomRef) {
        let occupants = self.occupancy.entry(room.clone()).or_default();
        if !occupants.contains(&id) {
            occupants.push(id);
        }
    }
}

#[derive(Default)]
pub struct InMemoryWorld {
    state: RwLock<WorldState>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: WorldSeed) -> Self {
        let world = Self::new();
        for room in seed.rooms {
            world.add_room(room);
        }
        for character in seed.characters {
            world.add_character(character);
        }
        for party in seed.parties {
            world.add_party(party);
        }
        world
    }

    /// Load a world seed from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read world file {}", path.display()))?;
        let seed: WorldSeed = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid world file {}", path.display()))?;

        Ok(Self::from_seed(seed))
    }

    // A panicking writer leaves plain data behind; keep serving it.
    fn read(&self) -> RwLockReadGuard<'_, WorldState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WorldState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_room(&self, room: Room) {
        self.write().rooms.insert(room.id.clone(), room);
    }

    /// Register a character and place it in its room
    ///
    /// Replaces any character already registered under the same id.
    pub fn add_character(&self, character: Character) {
        let mut state = self.write();
        let previous_room = state
            .characters
            .get(&character.id)
            .and_then(|previous| previous.room.clone());
        if let Some(room) = previous_room {
            state.leave_room(character.id, &room);
        }
        if let Some(room) = character.room.clone() {
            state.enter_room(character.id, &room);
        }
        state.characters.insert(character.id, character);
    }

    /// Register a party and point each known member at it
    pub fn add_party(&self, party: Party) {
        let mut state = self.write();
        for member in &party.members {
            if let Some(character) = state.characters.get_mut(member) {
                character.party = Some(party.id);
            }
        }
        state.parties.insert(party.id, party);
    }

    /// Put two characters in combat with each other
    pub fn engage(&self, a: CharacterId, b: CharacterId) -> Result<(), WorldError> {
        let mut state = self.write();
        for id in [a, b] {
            if !state.characters.contains_key(&id) {
                return Err(WorldError::CharacterNotFound(id));
            }
        }

        for (id, other) in [(a, b), (b, a)] {
            if let Some(character) = state.characters.get_mut(&id) {
                character.add_combatant(other);
            }
        }
        Ok(())
    }

    /// Characters with at least one active combatant
    pub fn characters_in_combat(&self) -> Vec<CharacterId> {
        let mut fighting: Vec<CharacterId> = self
            .read()
            .characters
            .values()
            .filter(|character| character.is_in_combat())
            .map(|character| character.id)
            .collect();
        fighting.sort();
        fighting
    }

    /// Player-controlled characters, in id order
    pub fn players(&self) -> Vec<CharacterId> {
        let mut players: Vec<CharacterId> = self
            .read()
            .characters
            .values()
            .filter(|character| !character.is_npc)
            .map(|character| character.id)
            .collect();
        players.sort();
        players
    }

    pub fn character_count(&self) -> usize {
        self.read().characters.len()
    }
}

impl WorldStatePort for InMemoryWorld {
    fn character(&self, id: CharacterId) -> Option<Character> {
        self.read().characters.get(&id).cloned()
    }

    fn party(&self, id: PartyId) -> Option<Party> {
        self.read().parties.get(&id).cloned()
    }

    fn room(&self, room: &RoomRef) -> Option<Room> {
        self.read().rooms.get(room).cloned()
    }

    fn occupants(&self, room: &RoomRef) -> Vec<CharacterId> {
        self.read()
            .occupancy
            .get(room)
            .cloned()
            .unwrap_or_default()
    }

    fn modify_character(
        &self,
        id: CharacterId,
        apply: &mut dyn FnMut(&mut Character),
    ) -> Result<(), WorldError> {
        let mut state = self.write();
        let character = state
            .characters
            .get_mut(&id)
            .ok_or(WorldError::CharacterNotFound(id))?;
        apply(character);
        Ok(())
    }

    fn disengage(&self, id: CharacterId) -> Result<(), WorldError> {
        let mut state = self.write();
        let character = state
            .characters
            .get_mut(&id)
            .ok_or(WorldError::CharacterNotFound(id))?;
        let opponents = std::mem::take(&mut character.combatants);

        for opponent in opponents {
            if let Some(opponent) = state.characters.get_mut(&opponent) {
                opponent.remove_combatant(id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MovementPort for InMemoryWorld {
    async fn move_to(&self, id: CharacterId, destination: &RoomRef) -> Result<(), WorldError> {
        let mut state = self.write();
        if !state.rooms.contains_key(destination) {
            return Err(WorldError::RoomNotFound(destination.clone()));
        }

        let previous = state
            .characters
            .get_mut(&id)
            .ok_or(WorldError::CharacterNotFound(id))?
            .room
            .replace(destination.clone());

        if let Some(previous) = previous {
            state.leave_room(id, &previous);
        }
        state.enter_room(id, destination);
        debug!(character = %id, room = %destination, "Character moved");
        Ok(())
    }
}
