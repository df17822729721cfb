//! Session management for connected players
//!
//! Each connected character owns one session: its transport kind, the extra
//! prompts attached to it and the channel its output is written to. The
//! network layer holds the receiving end.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::ports::outbound::{PromptRenderer, SessionPort, TransportKind};
use crate::domain::value_objects::CharacterId;

/// Shown after the extra prompts on every prompt redisplay
pub const BASE_PROMPT: &str = "> ";

/// Messages sent from the server to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A line of markup
    Text { text: String },
    /// Full prompt block, rendered transports only
    Prompt { text: String },
    /// The client sent something the server could not use
    Error { message: String },
}

/// A connected player
pub struct PlayerSession {
    pub character: CharacterId,
    pub transport: TransportKind,
    pub connected_at: DateTime<Utc>,
    /// Extra prompts in attach order
    prompts: Vec<(String, PromptRenderer)>,
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl PlayerSession {
    fn send(&self, message: ServerMessage) {
        if self.sender.send(message).is_err() {
            warn!(character = %self.character, "Session channel closed, dropping output");
        }
    }
}

/// Registry of live sessions, keyed by character
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<CharacterId, PlayerSession>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<CharacterId, PlayerSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a session for a character, replacing any previous one
    ///
    /// # Returns
    ///
    /// The receiving end of the session's output
    pub fn connect(
        &self,
        character: CharacterId,
        transport: TransportKind,
    ) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let session = PlayerSession {
            character,
            transport,
            connected_at: Utc::now(),
            prompts: Vec::new(),
            sender,
        };

        if self.sessions().insert(character, session).is_some() {
            info!(character = %character, "Replaced existing session");
        } else {
            info!(character = %character, transport = ?transport, "Session connected");
        }
        receiver
    }

    /// Close a character's session once its client has dropped the output
    ///
    /// A session that was replaced by a newer connection still has a reader
    /// and is left open.
    ///
    /// # Returns
    ///
    /// `true` if a session was closed
    pub fn disconnect(&self, character: CharacterId) -> bool {
        let mut sessions = self.sessions();
        if !sessions
            .get(&character)
            .is_some_and(|session| session.sender.is_closed())
        {
            return false;
        }

        let removed = sessions.remove(&character);
        if let Some(session) = &removed {
            info!(
                character = %character,
                connected_for = %(Utc::now() - session.connected_at),
                "Session disconnected"
            );
        }
        removed.is_some()
    }

    /// Tell a client its last message was rejected
    pub fn report_error(&self, character: CharacterId, message: impl Into<String>) {
        if let Some(session) = self.sessions().get(&character) {
            session.send(ServerMessage::Error {
                message: message.into(),
            });
        }
    }

    #[cfg(test)]
    pub fn is_connected(&self, character: CharacterId) -> bool {
        self.sessions().contains_key(&character)
    }

    pub fn connected_count(&self) -> usize {
        self.sessions().len()
    }
}

impl SessionPort for SessionManager {
    fn say(&self, recipient: CharacterId, message: &str) {
        match self.sessions().get(&recipient) {
            Some(session) => session.send(ServerMessage::Text {
                text: message.to_string(),
            }),
            None => debug!(character = %recipient, "No session, dropping output"),
        }
    }

    fn transport(&self, id: CharacterId) -> Option<TransportKind> {
        self.sessions().get(&id).map(|session| session.transport)
    }

    fn has_prompt(&self, id: CharacterId, key: &str) -> bool {
        self.sessions()
            .get(&id)
            .is_some_and(|session| session.prompts.iter().any(|(k, _)| k == key))
    }

    fn add_prompt(&self, id: CharacterId, key: &str, renderer: PromptRenderer) {
        let mut sessions = self.sessions();
        let Some(session) = sessions.get_mut(&id) else {
            return;
        };
        if !session.transport.is_rendered() {
            debug!(character = %id, key, "Structured session, prompt not attached");
            return;
        }

        match session.prompts.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = renderer,
            None => session.prompts.push((key.to_string(), renderer)),
        }
    }

    fn remove_prompt(&self, id: CharacterId, key: &str) {
        if let Some(session) = self.sessions().get_mut(&id) {
            session.prompts.retain(|(k, _)| k != key);
        }
    }

    fn show_prompt(&self, id: CharacterId) {
        // Renderers read world state; don't run them under the session lock
        let (renderers, sender) = {
            let sessions = self.sessions();
            let Some(session) = sessions.get(&id) else {
                return;
            };
            if !session.transport.is_rendered() {
                return;
            }
            let renderers: Vec<PromptRenderer> =
                session.prompts.iter().map(|(_, r)| r.clone()).collect();
            (renderers, session.sender.clone())
        };

        let mut lines: Vec<String> = renderers
            .iter()
            .map(|render| render())
            .filter(|text| !text.is_empty())
            .collect();
        lines.push(BASE_PROMPT.to_string());

        if sender
            .send(ServerMessage::Prompt {
                text: lines.join("\r\n"),
            })
            .is_err()
        {
            warn!(character = %id, "Session channel closed, dropping prompt");
        }
    }
}
