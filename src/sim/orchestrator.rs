//! Level lifecycle
//!
//! The orchestrator owns level selection and the reset sequence. Every
//! (re)start overwrites score, lives, platform and ball outright, so nothing
//! leaks from one level session into the next.

use std::cell::Cell;
use std::rc::Rc;

use super::ball::Ball;
use super::block::HitOutcome;
use super::completion::LevelCompletionTracker;
use super::events::EventBus;
use super::level::Level;
use super::lives::LivesTracker;
use super::platform::Platform;
use super::score::ScoreTracker;
use super::signal::SubscriptionId;
use super::state::{GameState, GameStateMachine};
use crate::audio::{AudioSink, SoundEffect};
use crate::error::{ConfigError, LevelError};
use crate::ui::{GameOverScreen, Overlay};

/// Collaborators the orchestrator drives
pub struct OrchestratorParts {
    pub state: Rc<GameStateMachine>,
    pub events: Rc<EventBus>,
    pub score: Rc<ScoreTracker>,
    pub lives: Rc<LivesTracker>,
    pub completion: Rc<LevelCompletionTracker>,
    pub ball: Rc<Ball>,
    pub platform: Rc<Platform>,
    pub game_over: Rc<GameOverScreen>,
    pub level_selection: Rc<dyn Overlay>,
    pub audio: Rc<dyn AudioSink>,
}

pub struct LevelOrchestrator {
    parts: OrchestratorParts,
    levels: Vec<Level>,
    current: Cell<Option<usize>>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl LevelOrchestrator {
    /// Wire up the orchestrator. Fails if no levels are configured.
    pub fn new(parts: OrchestratorParts, levels: Vec<Level>) -> Result<Rc<Self>, ConfigError> {
        if levels.is_empty() {
            log::error!("LevelOrchestrator: no levels configured");
            return Err(ConfigError::NoLevels);
        }
        for level in levels.iter().filter(|l| l.block_count() == 0) {
            log::warn!("Level {} has no blocks and completes immediately", level.index);
        }

        let orchestrator = Rc::new(Self {
            parts,
            levels,
            current: Cell::new(None),
            subscription: Cell::new(None),
        });

        let weak = Rc::downgrade(&orchestrator);
        let id = orchestrator.parts.completion.on_level_completed().connect(move |_| {
            if let Some(orchestrator) = weak.upgrade() {
                orchestrator.handle_level_completed();
            }
        });
        orchestrator.subscription.set(Some(id));
        Ok(orchestrator)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Index of the level last selected, if any
    pub fn current_index(&self) -> Option<usize> {
        self.current.get()
    }

    /// The level currently in play
    pub fn active_level(&self) -> Option<&Level> {
        self.levels.iter().find(|level| level.is_active())
    }

    pub fn state(&self) -> &Rc<GameStateMachine> {
        &self.parts.state
    }

    pub fn score(&self) -> &Rc<ScoreTracker> {
        &self.parts.score
    }

    pub fn lives(&self) -> &Rc<LivesTracker> {
        &self.parts.lives
    }

    pub fn completion(&self) -> &Rc<LevelCompletionTracker> {
        &self.parts.completion
    }

    pub fn ball(&self) -> &Rc<Ball> {
        &self.parts.ball
    }

    pub fn platform(&self) -> &Rc<Platform> {
        &self.parts.platform
    }

    pub fn game_over_screen(&self) -> &Rc<GameOverScreen> {
        &self.parts.game_over
    }

    pub fn audio(&self) -> &Rc<dyn AudioSink> {
        &self.parts.audio
    }

    /// Start a fresh session on level `index`.
    ///
    /// An invalid index is logged and rejected without touching current state.
    pub fn select_level(&self, index: usize) -> Result<(), LevelError> {
        let Some(level) = self.levels.get(index) else {
            let err = LevelError::InvalidIndex {
                index,
                count: self.levels.len(),
            };
            log::error!("LevelOrchestrator: {err}");
            return Err(err);
        };

        log::info!("Starting level {} ({})", index, level.name);
        self.current.set(Some(index));
        self.deactivate_all_levels();
        level.activate();
        self.reset_gameplay_state();
        self.parts.level_selection.hide();
        self.parts.state.set_state(GameState::Playing);

        // Last, so a level with no blocks completes on top of Playing
        self.parts.completion.initialize_for_level(level.block_count());
        Ok(())
    }

    /// Restart the level last selected. Returns `false` if there is none.
    pub fn restart_current_level(&self) -> bool {
        let Some(index) = self.current.get() else {
            log::warn!("LevelOrchestrator: no active level to restart");
            return false;
        };
        log::info!("Restarting level {index}");
        self.select_level(index).is_ok()
    }

    /// Park every level and return to the level selection panel
    pub fn show_level_selection(&self) {
        log::info!("Returning to level selection");
        self.deactivate_all_levels();
        self.parts.completion.disarm();
        self.reset_gameplay_state();
        self.parts.level_selection.show();
        self.parts.state.set_state(GameState::Menu);
    }

    /// Hit a block of the active level by id
    pub fn hit_block(&self, block_id: u32) -> Option<HitOutcome> {
        let block = self.active_level()?.block(block_id)?;
        let outcome = block.hit(&self.parts.events);
        log::debug!("Block {block_id} hit: {outcome:?}");
        Some(outcome)
    }

    pub fn teardown(&self) {
        if let Some(id) = self.subscription.take() {
            self.parts.completion.on_level_completed().disconnect(id);
        }
    }

    fn deactivate_all_levels(&self) {
        for level in &self.levels {
            level.deactivate();
        }
    }

    fn reset_gameplay_state(&self) {
        let parts = &self.parts;
        parts.score.reset_score();
        parts.lives.reset_lives();
        parts.platform.reset_position();
        parts.ball.follow_platform(parts.platform.position());
        parts.ball.reset();
    }

    fn handle_level_completed(&self) {
        self.parts.audio.play(SoundEffect::Win);
        self.parts.game_over.show();
    }
}

impl Drop for LevelOrchestrator {
    fn drop(&mut self) {
        self.teardown();
    }
}
