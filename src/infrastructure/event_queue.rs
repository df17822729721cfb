//! Combat event queue
//!
//! Events raised while a handler runs (`killed`, `deathblow`, `experience`)
//! are pushed here and delivered by the event loop worker once the current
//! handler has finished.
//!
//! At most one `UpdateTick` per character waits in the queue at a time; a
//! tick emitted while another is still pending is dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::ports::outbound::EventEmitterPort;
use crate::domain::events::CombatEvent;
use crate::domain::value_objects::CharacterId;

/// An event waiting to be delivered to a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEvent {
    pub actor: CharacterId,
    pub event: CombatEvent,
}

type PendingTicks = Arc<Mutex<HashSet<CharacterId>>>;

fn lock(pending: &PendingTicks) -> MutexGuard<'_, HashSet<CharacterId>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Clone)]
pub struct EventQueue {
    sender: mpsc::UnboundedSender<QueuedEvent>,
    pending_ticks: PendingTicks,
}

/// Receiving end of the [`EventQueue`], owned by the event loop
pub struct EventReceiver {
    receiver: mpsc::UnboundedReceiver<QueuedEvent>,
    pending_ticks: PendingTicks,
}

impl EventQueue {
    pub fn new() -> (Self, EventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending_ticks = PendingTicks::default();
        (
            Self {
                sender,
                pending_ticks: Arc::clone(&pending_ticks),
            },
            EventReceiver {
                receiver,
                pending_ticks,
            },
        )
    }
}

impl EventEmitterPort for EventQueue {
    fn emit(&self, actor: CharacterId, event: CombatEvent) {
        let kind = event.kind();
        let is_tick = matches!(event, CombatEvent::UpdateTick);
        if is_tick && !lock(&self.pending_ticks).insert(actor) {
            debug!(actor = %actor, "Tick already pending, skipping");
            return;
        }

        if self.sender.send(QueuedEvent { actor, event }).is_err() {
            if is_tick {
                lock(&self.pending_ticks).remove(&actor);
            }
            warn!(actor = %actor, kind = %kind, "Event loop stopped, dropping event");
        }
    }
}

impl EventReceiver {
    /// Next queued event, `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<QueuedEvent> {
        let queued = self.receiver.recv().await?;
        self.release(&queued);
        Some(queued)
    }

    #[cfg(test)]
    pub fn try_recv(&mut self) -> Result<QueuedEvent, mpsc::error::TryRecvError> {
        let queued = self.receiver.try_recv()?;
        self.release(&queued);
        Ok(queued)
    }

    fn release(&self, queued: &QueuedEvent) {
        if matches!(queued.event, CombatEvent::UpdateTick) {
            lock(&self.pending_ticks).remove(&queued.actor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_delivered_in_order() {
        let (queue, mut receiver) = EventQueue::new();
        let hero = CharacterId::new();

        queue.emit(hero, CombatEvent::UpdateTick);
        queue.emit(hero, CombatEvent::Experience { amount: 3 });

        assert_eq!(receiver.try_recv().unwrap().event, CombatEvent::UpdateTick);
        assert_eq!(
            receiver.try_recv().unwrap(),
            QueuedEvent {
                actor: hero,
                event: CombatEvent::Experience { amount: 3 }
            }
        );
    }

    #[test]
    fn test_only_one_tick_pending_per_character() {
        let (queue, mut receiver) = EventQueue::new();
        let hero = CharacterId::new();
        let rat = CharacterId::new();

        queue.emit(hero, CombatEvent::UpdateTick);
        queue.emit(hero, CombatEvent::UpdateTick);
        queue.emit(rat, CombatEvent::UpdateTick);
        queue.emit(hero, CombatEvent::Experience { amount: 1 });
        queue.emit(hero, CombatEvent::Experience { amount: 1 });

        let mut delivered = Vec::new();
        while let Ok(queued) = receiver.try_recv() {
            delivered.push(queued);
        }
        assert_eq!(delivered.len(), 4);
        assert_eq!(
            delivered
                .iter()
                .filter(|q| q.actor == hero && q.event == CombatEvent::UpdateTick)
                .count(),
            1
        );

        // Once delivered, the next tick is accepted again
        queue.emit(hero, CombatEvent::UpdateTick);
        assert_eq!(receiver.try_recv().unwrap().actor, hero);
    }

    #[test]
    fn test_emit_after_loop_stopped_is_dropped() {
        let (queue, receiver) = EventQueue::new();
        drop(receiver);

        queue.emit(CharacterId::new(), CombatEvent::UpdateTick);
    }
}
