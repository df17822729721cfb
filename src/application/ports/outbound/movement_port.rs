use async_trait::async_trait;

use crate::application::ports::outbound::WorldError;
use crate::domain::value_objects::{CharacterId, RoomRef};

/// Port for relocating a character
///
/// Placement completes asynchronously (room enter hooks, area loading); the
/// returned future resolves once the character stands in the destination.
#[async_trait]
pub trait MovementPort: Send + Sync {
    async fn move_to(&self, id: CharacterId, destination: &RoomRef) -> Result<(), WorldError>;
}
