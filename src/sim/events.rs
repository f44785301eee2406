//! Gameplay event bus
//!
//! One channel: a block was destroyed and is worth some points. The bus is an
//! owned object shared through `Rc` and handed to whoever needs it.
//!
//! Events carry no block identity. Consumers that count them (level
//! completion) rely on exactly one level being active at a time.

use super::signal::{Signal, SubscriptionId};

/// A block reached its final hit-stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDestroyed {
    pub score: u32,
}

#[derive(Debug, Default)]
pub struct EventBus {
    block_destroyed: Signal<BlockDestroyed>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver immediately to every subscriber, in subscription order
    pub fn publish(&self, score: u32) {
        log::debug!("Block destroyed (+{score})");
        self.block_destroyed.emit(&BlockDestroyed { score });
    }

    pub fn subscribe(&self, handler: impl Fn(&BlockDestroyed) + 'static) -> SubscriptionId {
        self.block_destroyed.connect(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.block_destroyed.disconnect(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.block_destroyed.len()
    }
}
