//! Combat engine port - The collaborator that owns combat math
//!
//! Damage, regeneration rates, targeting and round scheduling all live behind
//! this port. The presentation layer only asks it to advance a character.

use crate::domain::value_objects::CharacterId;

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    /// The character's current target can't be attacked
    #[error("Invalid combat target: {0}")]
    InvalidTarget(String),

    #[error("Combat engine error: {0}")]
    Engine(String),
}

pub trait CombatEnginePort: Send + Sync {
    /// Apply passive regeneration for this tick
    fn start_regeneration(&self, actor: CharacterId) -> Result<(), CombatError>;

    /// Resolve the character's combat round
    ///
    /// # Returns
    ///
    /// `true` if the character took any action this tick
    fn update_round(&self, actor: CharacterId) -> Result<bool, CombatError>;
}
