//! Score accumulation from the event bus

use std::cell::Cell;
use std::rc::Rc;

use super::events::EventBus;
use super::signal::{Signal, SubscriptionId};

#[derive(Debug)]
pub struct ScoreTracker {
    events: Rc<EventBus>,
    subscription: Cell<Option<SubscriptionId>>,
    total: Cell<u64>,
    score_changed: Signal<u64>,
}

impl ScoreTracker {
    /// Create the tracker and subscribe it to `events`
    pub fn new(events: Rc<EventBus>) -> Rc<Self> {
        let tracker = Rc::new(Self {
            events: Rc::clone(&events),
            subscription: Cell::new(None),
            total: Cell::new(0),
            score_changed: Signal::new(),
        });

        let weak = Rc::downgrade(&tracker);
        let id = events.subscribe(move |event| {
            if let Some(tracker) = weak.upgrade() {
                tracker.add_score(event.score);
            }
        });
        tracker.subscription.set(Some(id));
        tracker
    }

    pub fn current(&self) -> u64 {
        self.total.get()
    }

    pub fn add_score(&self, value: u32) {
        let total = self.total.get().saturating_add(u64::from(value));
        self.total.set(total);
        self.score_changed.emit(&total);
    }

    pub fn reset_score(&self) {
        self.total.set(0);
        self.score_changed.emit(&0);
    }

    /// Fired with the new total after every change
    pub fn on_score_changed(&self) -> &Signal<u64> {
        &self.score_changed
    }

    pub fn teardown(&self) {
        if let Some(id) = self.subscription.take() {
            self.events.unsubscribe(id);
        }
    }
}

impl Drop for ScoreTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
