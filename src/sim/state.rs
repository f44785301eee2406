//! Top-level game state machine

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use super::signal::Signal;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Level selection is showing
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (lost all lives or cleared the level)
    GameOver,
}

/// Holds the current `GameState` and announces effective transitions.
///
/// There is no transition table: any state may follow any other. Callers
/// decide when a transition is meaningful.
#[derive(Debug, Default)]
pub struct GameStateMachine {
    current: Cell<GameState>,
    state_changed: Signal<GameState>,
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GameState {
        self.current.get()
    }

    pub fn is_playing(&self) -> bool {
        self.current() == GameState::Playing
    }

    /// Move to `target`. Setting the current state again is a no-op; otherwise
    /// every subscriber is notified before this returns. Returns whether the
    /// state changed.
    pub fn set_state(&self, target: GameState) -> bool {
        let previous = self.current.replace(target);
        if previous == target {
            return false;
        }
        log::debug!("Game state {previous:?} -> {target:?}");
        self.state_changed.emit(&target);
        true
    }

    pub fn state_changed(&self) -> &Signal<GameState> {
        &self.state_changed
    }
}
