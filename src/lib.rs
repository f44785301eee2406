//! Breakout - gameplay core for a paddle-and-blocks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, event bus, ball physics, levels)
//! - `settings`: Data-driven tuning and level layouts
//! - `ui`: Overlay contracts plus the pause and game-over screen controllers
//! - `audio`: Sound cue contract
//! - `error`: Configuration and level-selection errors

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{ConfigError, LevelError};
pub use settings::{LevelLayout, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball defaults
    pub const BALL_INITIAL_SPEED: f32 = 8.0;
    pub const BALL_ACCELERATION: f32 = 1.5;
    pub const BALL_MAX_SPEED: f32 = 18.0;
    /// Vertical velocity never drops below this fraction of speed
    pub const BALL_MIN_VERTICAL_FRACTION: f32 = 0.2;
    /// Horizontal spread of the platform reflection fan
    pub const PLATFORM_SPREAD: f32 = 1.8;
    /// Below this velocity magnitude the ball is considered at rest
    pub const BALL_MOVING_THRESHOLD: f32 = 0.1;
    pub const BALL_RADIUS: f32 = 0.2;

    /// Platform defaults
    pub const PLATFORM_SPEED: f32 = 12.0;
    pub const PLATFORM_SENSITIVITY: f32 = 0.02;
    pub const PLATFORM_HALF_WIDTH: f32 = 1.0;
    pub const PLATFORM_HALF_HEIGHT: f32 = 0.2;
    pub const PLATFORM_START_Y: f32 = -4.0;

    /// Arena (world units, origin at center)
    pub const ARENA_HALF_WIDTH: f32 = 5.0;
    pub const ARENA_TOP: f32 = 5.0;
    pub const LOSS_Y: f32 = -5.0;

    /// Scoring
    pub const SAND_SCORE: u32 = 100;
    pub const STONE_SCORE: u32 = 200;

    pub const STARTING_LIVES: u32 = 3;
}

/// Square root that clamps negative input to zero instead of producing NaN
#[inline]
pub fn clamped_sqrt(value: f32) -> f32 {
    value.max(0.0).sqrt()
}

/// Return `magnitude` carrying the sign of `reference` (zero counts as positive)
#[inline]
pub fn with_sign_of(magnitude: f32, reference: f32) -> f32 {
    if reference >= 0.0 { magnitude } else { -magnitude }
}
