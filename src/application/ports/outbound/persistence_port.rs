use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::Character;

/// Repository port for saving player state
#[async_trait]
pub trait CharacterPersistencePort: Send + Sync {
    /// Persist the character's current state
    async fn save(&self, character: &Character) -> Result<()>;
}
