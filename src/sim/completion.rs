//! Level completion tracking
//!
//! Counts down one block per `BlockDestroyed` event. Events do not say which
//! block broke, so the count is only meaningful while a single level is
//! active.

use std::cell::Cell;
use std::rc::Rc;

use super::events::EventBus;
use super::signal::{Signal, SubscriptionId};

#[derive(Debug)]
pub struct LevelCompletionTracker {
    events: Rc<EventBus>,
    subscription: Cell<Option<SubscriptionId>>,
    remaining: Cell<i64>,
    /// Tracking a level (notifications are ignored otherwise)
    armed: Cell<bool>,
    /// Completion already announced for the tracked level
    completed: Cell<bool>,
    level_completed: Signal<()>,
}

impl LevelCompletionTracker {
    /// Create the tracker and subscribe it to `events`
    pub fn new(events: Rc<EventBus>) -> Rc<Self> {
        let tracker = Rc::new(Self {
            events: Rc::clone(&events),
            subscription: Cell::new(None),
            remaining: Cell::new(0),
            armed: Cell::new(false),
            completed: Cell::new(false),
            level_completed: Signal::new(),
        });

        let weak = Rc::downgrade(&tracker);
        let id = events.subscribe(move |_| {
            if let Some(tracker) = weak.upgrade() {
                tracker.handle_block_destroyed();
            }
        });
        tracker.subscription.set(Some(id));
        tracker
    }

    /// Start tracking a level with `block_count` blocks. A level with no
    /// blocks completes immediately.
    pub fn initialize_for_level(&self, block_count: usize) {
        self.remaining.set(block_count as i64);
        self.armed.set(true);
        self.completed.set(false);
        self.check_completion();
    }

    /// Stop tracking; notifications are ignored until the next initialize
    pub fn disarm(&self) {
        self.armed.set(false);
        self.remaining.set(0);
    }

    pub fn remaining(&self) -> i64 {
        self.remaining.get()
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    /// Fired once per tracked level
    pub fn on_level_completed(&self) -> &Signal<()> {
        &self.level_completed
    }

    /// Unsubscribe from the event bus. Safe to call more than once.
    pub fn teardown(&self) {
        if let Some(id) = self.subscription.take() {
            self.events.unsubscribe(id);
        }
    }

    fn handle_block_destroyed(&self) {
        if !self.armed.get() {
            log::debug!("Block destroyed with no level tracked");
            return;
        }
        self.remaining.set(self.remaining.get() - 1);
        self.check_completion();
    }

    fn check_completion(&self) {
        if self.remaining.get() > 0 || self.completed.get() {
            return;
        }
        self.completed.set(true);
        log::info!("Level completed");
        self.level_completed.emit(&());
    }
}

impl Drop for LevelCompletionTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
