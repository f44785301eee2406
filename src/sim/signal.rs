//! Synchronous single-threaded notifications
//!
//! A `Signal` delivers a value to every connected handler, in connection
//! order, before `emit` returns. Handlers see a snapshot taken at emit time:
//! handlers connected during an emit are not called by it, and handlers
//! disconnected during an emit are skipped if they have not run yet.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle identifying one registration on one signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    id: SubscriptionId,
    handler: Handler<T>,
}

pub struct Signal<T> {
    slots: RefCell<Vec<Slot<T>>>,
    next_id: Cell<u64>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.len())
            .finish()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Register a handler; it runs after every handler registered before it
    pub fn connect(&self, handler: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.slots.borrow_mut().push(Slot {
            id,
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a registration. Returns `false` if it was already removed.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots.iter().position(|slot| slot.id == id) {
            Some(index) => {
                slots.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, id: SubscriptionId) -> bool {
        self.slots.borrow().iter().any(|slot| slot.id == id)
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Deliver `value` to every handler connected at call time
    pub fn emit(&self, value: &T) {
        // No borrow is held while handlers run, so they may connect/disconnect freely
        let snapshot: Vec<(SubscriptionId, Handler<T>)> = self
            .slots
            .borrow()
            .iter()
            .map(|slot| (slot.id, Rc::clone(&slot.handler)))
            .collect();

        for (id, handler) in snapshot {
            if self.is_connected(id) {
                handler(value);
            }
        }
    }
}
