//! Lives bookkeeping
//!
//! Listens for the ball being lost. While lives remain the ball goes back on
//! the platform; the last loss latches game over until the next reset.

use std::cell::Cell;
use std::rc::Rc;

use super::ball::Ball;
use super::signal::{Signal, SubscriptionId};

#[derive(Debug)]
pub struct LivesTracker {
    ball: Rc<Ball>,
    subscription: Cell<Option<SubscriptionId>>,
    starting: u32,
    current: Cell<u32>,
    game_over: Cell<bool>,
    lives_changed: Signal<u32>,
    game_over_signal: Signal<()>,
}

impl LivesTracker {
    /// Create the tracker with `starting` lives and subscribe it to `ball`
    pub fn new(ball: Rc<Ball>, starting: u32) -> Rc<Self> {
        debug_assert!(starting > 0, "starting lives must be positive");
        let tracker = Rc::new(Self {
            ball: Rc::clone(&ball),
            subscription: Cell::new(None),
            starting,
            current: Cell::new(starting),
            game_over: Cell::new(false),
            lives_changed: Signal::new(),
            game_over_signal: Signal::new(),
        });

        let weak = Rc::downgrade(&tracker);
        let id = ball.on_lost().connect(move |_| {
            if let Some(tracker) = weak.upgrade() {
                tracker.lose_life();
            }
        });
        tracker.subscription.set(Some(id));
        tracker
    }

    pub fn current(&self) -> u32 {
        self.current.get()
    }

    pub fn starting(&self) -> u32 {
        self.starting
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.get()
    }

    /// Lose one life. No-op once game over has been reached.
    pub fn lose_life(&self) {
        if self.game_over.get() {
            return;
        }

        let lives = self.current.get().saturating_sub(1);
        self.current.set(lives);
        log::debug!("Life lost, {lives} remaining");
        self.lives_changed.emit(&lives);

        if lives > 0 {
            self.ball.reset();
        } else {
            self.game_over.set(true);
            log::info!("Game over: out of lives");
            self.game_over_signal.emit(&());
        }
    }

    pub fn reset_lives(&self) {
        self.current.set(self.starting);
        self.game_over.set(false);
        self.lives_changed.emit(&self.starting);
    }

    /// Fired with the new count after every change
    pub fn on_lives_changed(&self) -> &Signal<u32> {
        &self.lives_changed
    }

    /// Fired once when the last life is lost
    pub fn on_game_over(&self) -> &Signal<()> {
        &self.game_over_signal
    }

    pub fn teardown(&self) {
        if let Some(id) = self.subscription.take() {
            self.ball.on_lost().disconnect(id);
        }
    }
}

impl Drop for LivesTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
