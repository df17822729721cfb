//! Background workers driving the combat layer
//!
//! - the event loop delivers queued events to the combat service one at a
//!   time, so no two handlers ever run concurrently
//! - the tick worker schedules `UpdateTick` for everyone still fighting,
//!   never more than one pending tick per character

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::application::ports::outbound::EventEmitterPort;
use crate::application::services::combat::{CombatEventError, CombatEventService};
use crate::domain::events::CombatEvent;
use crate::infrastructure::event_queue::{EventReceiver, QueuedEvent};
use crate::infrastructure::world::InMemoryWorld;

/// Worker that delivers queued combat events until every sender is gone
pub async fn event_loop_worker(
    service: Arc<CombatEventService>,
    mut events: EventReceiver,
) {
    tracing::info!("Starting combat event loop");
    while let Some(QueuedEvent { actor, event }) = events.recv().await {
        match service.dispatch(actor, &event).await {
            Ok(()) => {}
            Err(CombatEventError::NoRespawnRoom(id)) => {
                tracing::error!("Character {} died with nowhere to respawn", id);
            }
            Err(e) => {
                tracing::error!(
                    "Error handling {} for character {}: {}",
                    event.kind(),
                    actor,
                    e
                );
            }
        }
    }
    tracing::info!("Combat event loop stopped");
}

/// Worker that queues a combat tick for every character in combat
///
/// Characters whose previous tick is still waiting in the queue are not
/// ticked again until the event loop has picked it up.
pub async fn combat_tick_worker(
    world: Arc<InMemoryWorld>,
    events: Arc<dyn EventEmitterPort>,
    period: Duration,
) {
    tracing::info!("Starting combat tick worker ({:?} period)", period);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        for actor in world.characters_in_combat() {
            events.emit(actor, CombatEvent::UpdateTick);
        }
    }
}
