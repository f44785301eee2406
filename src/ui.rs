//! Screen controllers
//!
//! Panels themselves (level selection, pause, game over) are drawn elsewhere
//! and only need to be shown or hidden. The controllers here decide when, and
//! drive the game state machine accordingly.

use std::cell::Cell;
use std::rc::Rc;

use crate::sim::{GameState, GameStateMachine, LevelOrchestrator, LivesTracker, SubscriptionId};

/// A panel that can be shown or hidden
pub trait Overlay {
    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;

    fn show(&self) {
        self.set_visible(true);
    }

    fn hide(&self) {
        self.set_visible(false);
    }
}

/// Overlay for headless runs; remembers its visibility
#[derive(Debug)]
pub struct HeadlessOverlay {
    name: &'static str,
    visible: Cell<bool>,
}

impl HeadlessOverlay {
    pub fn new(name: &'static str, visible: bool) -> Self {
        Self {
            name,
            visible: Cell::new(visible),
        }
    }
}

impl Overlay for HeadlessOverlay {
    fn set_visible(&self, visible: bool) {
        if self.visible.replace(visible) != visible {
            log::debug!("{} {}", self.name, if visible { "shown" } else { "hidden" });
        }
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

/// End-of-run screen, shown on game over and on level completion
pub struct GameOverScreen {
    state: Rc<GameStateMachine>,
    lives: Rc<LivesTracker>,
    view: Rc<dyn Overlay>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl GameOverScreen {
    /// Create the screen, hidden, and listen for the lives running out
    pub fn new(state: Rc<GameStateMachine>, lives: Rc<LivesTracker>, view: Rc<dyn Overlay>) -> Rc<Self> {
        view.hide();
        let screen = Rc::new(Self {
            state,
            lives: Rc::clone(&lives),
            view,
            subscription: Cell::new(None),
        });

        let weak = Rc::downgrade(&screen);
        let id = lives.on_game_over().connect(move |_| {
            if let Some(screen) = weak.upgrade() {
                screen.show();
            }
        });
        screen.subscription.set(Some(id));
        screen
    }

    pub fn is_visible(&self) -> bool {
        self.view.is_visible()
    }

    /// Show the panel and stop play
    pub fn show(&self) {
        self.view.show();
        self.state.set_state(GameState::GameOver);
    }

    pub fn restart(&self, orchestrator: &LevelOrchestrator) {
        orchestrator.restart_current_level();
        self.view.hide();
    }

    pub fn back_to_menu(&self, orchestrator: &LevelOrchestrator) {
        orchestrator.show_level_selection();
        self.view.hide();
    }

    pub fn teardown(&self) {
        if let Some(id) = self.subscription.take() {
            self.lives.on_game_over().disconnect(id);
        }
    }
}

impl Drop for GameOverScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// In-game pause panel
pub struct PauseMenu {
    state: Rc<GameStateMachine>,
    view: Rc<dyn Overlay>,
}

impl PauseMenu {
    pub fn new(state: Rc<GameStateMachine>, view: Rc<dyn Overlay>) -> Self {
        view.hide();
        Self { state, view }
    }

    pub fn is_visible(&self) -> bool {
        self.view.is_visible()
    }

    /// Pause from Playing. Returns whether the game was paused.
    pub fn pause(&self) -> bool {
        if self.state.current() != GameState::Playing {
            return false;
        }
        self.view.show();
        self.state.set_state(GameState::Paused)
    }

    /// Resume from Paused. Returns whether play resumed.
    pub fn resume(&self) -> bool {
        if self.state.current() != GameState::Paused {
            return false;
        }
        self.view.hide();
        self.state.set_state(GameState::Playing)
    }

    /// Toggle between Playing and Paused
    pub fn toggle(&self) -> bool {
        self.pause() || self.resume()
    }

    pub fn back_to_menu(&self, orchestrator: &LevelOrchestrator) {
        orchestrator.show_level_selection();
        self.view.hide();
    }
}
