//! Game loop
//!
//! Two rates drive the game: a variable-rate tick samples input and does
//! bookkeeping, and a fixed-rate tick advances ball physics and resolves
//! collisions. Both only act while the state machine says Playing.

use std::rc::Rc;

use glam::Vec2;

use super::ball::Ball;
use super::collision::{BelowLine, Walls, ball_aabb_collision, ball_wall_collision};
use super::completion::LevelCompletionTracker;
use super::events::EventBus;
use super::input::{DEFAULT_LAUNCH_DIRECTION, InputScheme, PointerEvent};
use super::level::Level;
use super::lives::LivesTracker;
use super::orchestrator::{LevelOrchestrator, OrchestratorParts};
use super::platform::Platform;
use super::score::ScoreTracker;
use super::state::{GameState, GameStateMachine};
use crate::audio::{AudioSink, HeadlessAudio, SoundEffect};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::{LevelLayout, Tuning};
use crate::ui::{GameOverScreen, HeadlessOverlay, Overlay, PauseMenu};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal platform delta, already sensitivity-scaled
    pub drag_delta: f32,
    /// Raw pointer samples since the last frame, fed to the input scheme
    pub pointer: Vec<PointerEvent>,
    /// Held direction for axis input; keeps the previous value when unset
    pub axis: Option<f32>,
    /// Launch ball (click/tap/space)
    pub launch: bool,
    /// Launch direction; straight up when unset
    pub launch_direction: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Presentation collaborators
pub struct Frontend {
    pub level_selection: Rc<dyn Overlay>,
    pub game_over: Rc<dyn Overlay>,
    pub pause: Rc<dyn Overlay>,
    pub audio: Rc<dyn AudioSink>,
}

impl Frontend {
    /// No display, no sound
    pub fn headless() -> Self {
        Self {
            level_selection: Rc::new(HeadlessOverlay::new("level selection", true)),
            game_over: Rc::new(HeadlessOverlay::new("game over", false)),
            pause: Rc::new(HeadlessOverlay::new("pause", false)),
            audio: Rc::new(HeadlessAudio::new()),
        }
    }
}

pub struct Game {
    walls: Walls,
    loss_region: BelowLine,
    orchestrator: Rc<LevelOrchestrator>,
    pause_menu: PauseMenu,
    input: InputScheme,
    accumulator: f32,
    /// Fixed ticks simulated while playing
    time_ticks: u64,
}

impl Game {
    /// Assemble every component and wire their notifications
    pub fn new(tuning: Tuning, layouts: &[LevelLayout], frontend: Frontend) -> Result<Self, ConfigError> {
        tuning.validate()?;
        if layouts.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        let state = Rc::new(GameStateMachine::new());
        let events = Rc::new(EventBus::new());
        let platform = Rc::new(Platform::new(&tuning.platform, &tuning.arena));
        let ball = Rc::new(Ball::new(tuning.ball.clone(), platform.position()));
        let score = ScoreTracker::new(Rc::clone(&events));
        let completion = LevelCompletionTracker::new(Rc::clone(&events));
        let lives = LivesTracker::new(Rc::clone(&ball), tuning.starting_lives);
        let game_over = GameOverScreen::new(Rc::clone(&state), Rc::clone(&lives), frontend.game_over);
        let pause_menu = PauseMenu::new(Rc::clone(&state), frontend.pause);

        let parts = OrchestratorParts {
            state,
            events,
            score,
            lives,
            completion,
            ball,
            platform,
            game_over,
            level_selection: frontend.level_selection,
            audio: frontend.audio,
        };
        let levels = Level::build_all(layouts, &tuning.scores)?;
        let orchestrator = LevelOrchestrator::new(parts, levels)?;

        Ok(Self {
            walls: Walls {
                half_width: tuning.arena.half_width,
                top: tuning.arena.top,
            },
            loss_region: BelowLine {
                y: tuning.arena.loss_y,
            },
            orchestrator,
            pause_menu,
            input: InputScheme::from_tuning(&tuning.platform),
            accumulator: 0.0,
            time_ticks: 0,
        })
    }

    /// Default tuning, built-in levels, headless frontend
    pub fn headless() -> Result<Self, ConfigError> {
        Self::new(Tuning::default(), &LevelLayout::builtin(), Frontend::headless())
    }

    /// Show level selection
    pub fn initialize(&mut self) {
        log::info!("Game initialized with {} levels", self.orchestrator.level_count());
        self.accumulator = 0.0;
        self.orchestrator.show_level_selection();
    }

    pub fn orchestrator(&self) -> &Rc<LevelOrchestrator> {
        &self.orchestrator
    }

    pub fn pause_menu(&self) -> &PauseMenu {
        &self.pause_menu
    }

    pub fn state(&self) -> GameState {
        self.orchestrator.state().current()
    }

    pub fn ball(&self) -> &Rc<Ball> {
        self.orchestrator.ball()
    }

    pub fn platform(&self) -> &Rc<Platform> {
        self.orchestrator.platform()
    }

    pub fn input_scheme(&self) -> &InputScheme {
        &self.input
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Variable-rate tick: input sampling and bookkeeping
    pub fn on_tick(&mut self, dt: f32, input: &TickInput) {
        if input.pause {
            self.pause_menu.toggle();
        }

        // Gesture state tracks the pointer even outside of play
        let mut delta = input.drag_delta;
        for event in &input.pointer {
            delta += self.input.pointer(*event);
        }
        if let Some(value) = input.axis {
            self.input.set_axis(value);
        }
        delta += self.input.held_delta();

        if !self.orchestrator.state().is_playing() {
            return;
        }

        let platform = self.orchestrator.platform();
        let ball = self.orchestrator.ball();
        platform.move_by(delta, dt);
        ball.follow_platform(platform.position());

        if input.launch && !ball.is_launched() {
            let direction = input.launch_direction.unwrap_or(DEFAULT_LAUNCH_DIRECTION);
            if ball.launch(direction) {
                self.orchestrator.audio().play(SoundEffect::Launch);
            }
        }
    }

    /// Fixed-rate tick: ball physics and collisions
    pub fn on_fixed_tick(&mut self, dt: f32) {
        if !self.orchestrator.state().is_playing() {
            return;
        }
        self.time_ticks += 1;

        let ball = self.orchestrator.ball();
        ball.follow_platform(self.orchestrator.platform().position());
        if !ball.is_launched() {
            return;
        }

        ball.fixed_tick(dt);
        self.resolve_collisions();
    }

    /// Run one frame: input, then as many fixed steps as have accumulated.
    /// Returns the number of fixed steps taken.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        let frame_dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.on_tick(frame_dt, input);

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.on_fixed_tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Unhook every subscription
    pub fn teardown(&mut self) {
        self.orchestrator.teardown();
        self.orchestrator.game_over_screen().teardown();
        self.orchestrator.lives().teardown();
        self.orchestrator.score().teardown();
        self.orchestrator.completion().teardown();
        log::info!("Game torn down after {} ticks", self.time_ticks);
    }

    fn resolve_collisions(&self) {
        let orchestrator = &self.orchestrator;
        let ball = orchestrator.ball();
        let audio = orchestrator.audio();
        let radius = ball.radius();

        let wall = ball_wall_collision(ball.position(), radius, &self.walls);
        if ball.resolve_contact(&wall) {
            audio.play(SoundEffect::Hit);
        }

        // At most one block per step
        let block_contact = orchestrator.active_level().and_then(|level| {
            let position = ball.position();
            level
                .blocks()
                .iter()
                .filter(|block| block.is_active())
                .find_map(|block| {
                    let contact = ball_aabb_collision(position, radius, &block.rect);
                    contact.hit.then_some((block.id, contact))
                })
        });
        // A ball already leaving the block is only pushed clear
        let struck = block_contact.filter(|(_, contact)| ball.resolve_contact(contact));
        if let Some((block_id, _)) = struck {
            audio.play(SoundEffect::Hit);
            orchestrator.hit_block(block_id);
            // Clearing the last block ends play
            if !orchestrator.state().is_playing() {
                return;
            }
        }

        let platform = orchestrator.platform();
        let contact = ball_aabb_collision(ball.position(), radius, &platform.rect());
        if contact.hit {
            if contact.normal.y > 0.0 && ball.velocity().y < 0.0 {
                ball.resolve_contact(&contact);
                ball.reflect_from_platform(contact.point.x, platform.bounds());
                audio.play(SoundEffect::Hit);
            } else if ball.resolve_contact(&contact) {
                audio.play(SoundEffect::Hit);
            }
        }

        if ball.check_loss(&self.loss_region) {
            audio.play(SoundEffect::Lose);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_game() -> Game {
        let mut game = Game::headless().expect("default game");
        game.initialize();
        game.orchestrator().select_level(0).expect("level 0");
        game
    }

    #[test]
    fn test_starts_in_menu() {
        let mut game = Game::headless().expect("default game");
        game.initialize();
        assert_eq!(game.state(), GameState::Menu);

        // Nothing moves outside of play
        game.advance(0.05, &TickInput { launch: true, ..Default::default() });
        assert!(!game.ball().is_launched());
        assert_eq!(game.time_ticks(), 0);
    }

    #[test]
    fn test_launch_on_input() {
        let mut game = playing_game();
        game.advance(SIM_DT, &TickInput::default());
        assert!(!game.ball().is_launched());

        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        game.advance(SIM_DT, &launch);
        assert!(game.ball().is_launched());
        assert!(game.ball().velocity().y > 0.0);
    }

    #[test]
    fn test_attached_ball_follows_platform() {
        let mut game = playing_game();
        let drag = TickInput {
            drag_delta: 1.0,
            ..Default::default()
        };
        game.advance(0.05, &drag);
        let platform_x = game.platform().position().x;
        assert!(platform_x > 0.0);
        assert!((game.ball().position().x - platform_x).abs() < 1e-5);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut game = playing_game();
        game.advance(
            SIM_DT,
            &TickInput {
                launch: true,
                ..Default::default()
            },
        );
        game.advance(
            SIM_DT,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        assert_eq!(game.state(), GameState::Paused);
        assert!(game.pause_menu().is_visible());

        let frozen = game.ball().position();
        let ticks = game.time_ticks();
        for _ in 0..10 {
            game.advance(0.05, &TickInput::default());
        }
        assert_eq!(game.ball().position(), frozen);
        assert_eq!(game.time_ticks(), ticks);

        game.advance(
            SIM_DT,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut game = playing_game();
        let steps = game.advance(10.0, &TickInput::default());
        assert!(steps <= MAX_SUBSTEPS);
        assert_eq!(game.advance(0.0, &TickInput::default()), 0);
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let mut game = Game::new(Tuning::default(), &[LevelLayout::default()], Frontend::headless())
            .expect("empty layout is allowed");
        game.initialize();
        // An empty level completes immediately; force play to watch the ball
        game.orchestrator().select_level(0).expect("level 0");
        game.orchestrator().state().set_state(GameState::Playing);

        game.advance(
            SIM_DT,
            &TickInput {
                launch: true,
                ..Default::default()
            },
        );
        let mut went_down = false;
        for _ in 0..240 {
            game.on_fixed_tick(SIM_DT);
            if game.ball().velocity().y < 0.0 {
                went_down = true;
                break;
            }
        }
        assert!(went_down);
        assert!(game.ball().position().y < Tuning::default().arena.top);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut game = playing_game();
            let inputs = [
                TickInput {
                    drag_delta: 0.5,
                    ..Default::default()
                },
                TickInput {
                    launch: true,
                    launch_direction: Some(Vec2::new(0.4, 1.0)),
                    ..Default::default()
                },
                TickInput {
                    drag_delta: -0.3,
                    ..Default::default()
                },
            ];
            for input in &inputs {
                game.advance(1.0 / 60.0, input);
            }
            for _ in 0..600 {
                game.advance(1.0 / 60.0, &TickInput::default());
            }
            (game.ball().body(), game.orchestrator().score().current())
        };

        assert_eq!(run(), run());
    }

    fn game_with(tuning: Tuning, layouts: &[LevelLayout]) -> Game {
        let mut game = Game::new(tuning, layouts, Frontend::headless()).expect("valid setup");
        game.initialize();
        game.orchestrator().select_level(0).expect("level 0");
        game
    }

    #[test]
    fn test_drag_scaled_by_platform_sensitivity() {
        let drag = TickInput {
            pointer: vec![PointerEvent::Down { x: 0.0 }, PointerEvent::Move { x: 25.0 }],
            ..Default::default()
        };
        let moved = |sensitivity| {
            let mut tuning = Tuning::default();
            tuning.platform.sensitivity = sensitivity;
            let mut game = game_with(tuning, &LevelLayout::builtin());
            game.on_tick(0.05, &drag);
            game.platform().position().x
        };

        let slow = moved(0.02);
        let fast = moved(0.04);
        assert!(slow > 0.0);
        assert!((fast - 2.0 * slow).abs() < 1e-5);
    }

    #[test]
    fn test_axis_input_is_held_between_frames() {
        let mut tuning = Tuning::default();
        tuning.platform.input = crate::settings::InputKind::Axis;
        let mut game = game_with(tuning, &LevelLayout::builtin());
        assert!(matches!(game.input_scheme(), InputScheme::Axis(_)));

        game.on_tick(
            0.05,
            &TickInput {
                axis: Some(-1.0),
                ..Default::default()
            },
        );
        let first = game.platform().position().x;
        assert!(first < 0.0);

        game.on_tick(0.05, &TickInput::default());
        assert!(game.platform().position().x < first);
    }

    #[test]
    fn test_ball_leaving_a_block_does_not_hit_it() {
        use crate::settings::BlockSpec;
        use crate::sim::BlockKind;

        // Thin block just above the docked ball, already overlapping its top
        let layout = LevelLayout {
            name: "overlap".to_string(),
            blocks: vec![BlockSpec {
                kind: BlockKind::Sand,
                center: Vec2::new(0.0, -3.32),
                half_extents: Vec2::new(0.5, 0.1),
            }],
        };
        let mut game = game_with(Tuning::default(), &[layout]);
        game.on_tick(
            SIM_DT,
            &TickInput {
                launch: true,
                launch_direction: Some(Vec2::new(1.0, -0.2)),
                ..Default::default()
            },
        );

        // Moving down and away from the block
        game.on_fixed_tick(SIM_DT);
        let level = game.orchestrator().active_level().expect("active");
        assert!(level.blocks()[0].is_active());
        assert_eq!(game.state(), GameState::Playing);

        // Bounced off the platform, the ball comes back up into it
        for _ in 0..10 {
            if game.state() != GameState::Playing {
                break;
            }
            game.on_fixed_tick(SIM_DT);
        }
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.orchestrator().score().current(), 100);
    }

    #[test]
    fn test_teardown_detaches_trackers() {
        let mut game = playing_game();
        game.teardown();
        // Completion tracker no longer counts, score no longer moves
        let level = game.orchestrator().active_level().expect("level 0 active");
        for block in level.blocks() {
            game.orchestrator().hit_block(block.id);
        }
        assert_eq!(game.orchestrator().score().current(), 0);
        assert_eq!(game.state(), GameState::Playing);
    }
}
