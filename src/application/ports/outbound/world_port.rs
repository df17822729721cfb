//! World state port - Read/write access to the authoritative world registry
//!
//! Characters reference rooms, parties and each other by id; this port is
//! where those ids are resolved. Reads return snapshots, writes go through
//! [`WorldStatePort::modify_character`] so the registry stays the only owner.

use crate::domain::entities::{Character, Party, Room};
use crate::domain::value_objects::{CharacterId, PartyId, RoomRef};

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Room not found: {0}")]
    RoomNotFound(RoomRef),
}

pub trait WorldStatePort: Send + Sync {
    /// Snapshot of a character, `None` once it has left the world
    fn character(&self, id: CharacterId) -> Option<Character>;

    fn party(&self, id: PartyId) -> Option<Party>;

    fn room(&self, room: &RoomRef) -> Option<Room>;

    /// Characters standing in a room, in stable order
    fn occupants(&self, room: &RoomRef) -> Vec<CharacterId>;

    /// Apply an in-place change to a character
    fn modify_character(
        &self,
        id: CharacterId,
        apply: &mut dyn FnMut(&mut Character),
    ) -> Result<(), WorldError>;

    /// Remove a character from combat, on both sides of every engagement
    fn disengage(&self, id: CharacterId) -> Result<(), WorldError>;
}
