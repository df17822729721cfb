use async_trait::async_trait;

use crate::domain::value_objects::CharacterId;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Command {command} failed: {reason}")]
    Failed { command: String, reason: String },
}

/// Port for running player commands on a character's behalf
#[async_trait]
pub trait CommandPort: Send + Sync {
    async fn execute(&self, command: &str, args: &str, actor: CharacterId)
        -> Result<(), CommandError>;
}
