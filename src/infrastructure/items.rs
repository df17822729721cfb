//! Item event bus
//!
//! Item scripts (on-hit procs, durability, ...) subscribe here to hear about
//! hits landed with the item they are attached to.

use tokio::sync::broadcast;
use tracing::trace;

use crate::application::ports::outbound::ItemEventPort;
use crate::domain::events::ItemHit;

const CHANNEL_CAPACITY: usize = 256;

pub struct ItemEventBus {
    sender: broadcast::Sender<ItemHit>,
}

impl ItemEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ItemHit> {
        self.sender.subscribe()
    }
}

impl Default for ItemEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemEventPort for ItemEventBus {
    fn item_hit(&self, event: ItemHit) {
        // No subscribers just means no item scripts are loaded
        if self.sender.send(event).is_err() {
            trace!("Item hit with no subscribers");
        }
    }
}
