//! Session port - Output and prompt handling for a character's connection
//!
//! This port abstracts the player session so combat services can narrate and
//! manage prompts without knowing how the bytes reach the client.

use std::sync::Arc;

use crate::domain::value_objects::CharacterId;

/// Key of the in-combat health bar prompt
pub const COMBAT_PROMPT: &str = "combat";

/// How a session consumes output
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Telnet-style client that displays rendered text and prompts
    Rendered,
    /// Client consuming structured messages (websocket UI); never gets prompts
    Structured,
}

impl TransportKind {
    pub fn is_rendered(self) -> bool {
        matches!(self, TransportKind::Rendered)
    }
}

/// Prompt text producer, evaluated every time the prompt is displayed
pub type PromptRenderer = Arc<dyn Fn() -> String + Send + Sync>;

pub trait SessionPort: Send + Sync {
    /// Send a line of markup to the character's session
    ///
    /// Characters without a live session silently drop output.
    fn say(&self, recipient: CharacterId, message: &str);

    /// Transport of the character's session; `None` when not connected
    fn transport(&self, id: CharacterId) -> Option<TransportKind>;

    fn has_prompt(&self, id: CharacterId, key: &str) -> bool;

    fn add_prompt(&self, id: CharacterId, key: &str, renderer: PromptRenderer);

    fn remove_prompt(&self, id: CharacterId, key: &str);

    /// Redisplay the session's prompt, re-evaluating every attached prompt
    fn show_prompt(&self, id: CharacterId);
}
