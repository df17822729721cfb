//! Listener registry keyed by event kind

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::CombatEventError;
use crate::domain::events::{CombatEvent, EventKind};
use crate::domain::value_objects::CharacterId;

/// A reaction to combat events delivered to a character
#[async_trait]
pub trait CombatListener: Send + Sync {
    async fn on_event(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError>;
}

/// Maps each event kind to the listeners registered for it
#[derive(Default)]
pub struct CombatEventRegistry {
    listeners: HashMap<EventKind, Vec<Arc<dyn CombatListener>>>,
}

impl CombatEventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, listener: Arc<dyn CombatListener>) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    #[cfg(test)]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to the listeners of its kind, in registration order
    ///
    /// Stops at the first listener error.
    pub async fn dispatch(
        &self,
        actor: CharacterId,
        event: &CombatEvent,
    ) -> Result<(), CombatEventError> {
        let Some(listeners) = self.listeners.get(&event.kind()) else {
            tracing::trace!(kind = %event.kind(), "No listeners registered");
            return Ok(());
        };

        for listener in listeners {
            listener.on_event(actor, event).await?;
        }
        Ok(())
    }
}
