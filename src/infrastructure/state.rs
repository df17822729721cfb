//! Shared state for the network-facing handlers

use std::sync::Arc;

use crate::application::ports::outbound::{CommandPort, EventEmitterPort};
use crate::infrastructure::session::SessionManager;
use crate::infrastructure::world::InMemoryWorld;

/// Everything the websocket and HTTP handlers reach into
pub struct AppState {
    pub world: Arc<InMemoryWorld>,
    /// Live player sessions
    pub sessions: Arc<SessionManager>,
    pub commands: Arc<dyn CommandPort>,
    /// Feed into the combat event loop
    pub events: Arc<dyn EventEmitterPort>,
}

impl AppState {
    pub fn new(
        world: Arc<InMemoryWorld>,
        sessions: Arc<SessionManager>,
        commands: Arc<dyn CommandPort>,
        events: Arc<dyn EventEmitterPort>,
    ) -> Self {
        Self {
            world,
            sessions,
            commands,
            events,
        }
    }
}
