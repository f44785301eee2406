//! Game tuning and level layouts
//!
//! Everything is data-driven: a JSON document can override any subset of the
//! defaults, and level layouts can be authored as JSON or taken from the
//! built-in set.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::BlockKind;

/// Ball physics parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub initial_speed: f32,
    pub acceleration_per_second: f32,
    pub max_speed: f32,
    /// Minimum |vy| as a fraction of the current speed
    pub min_vertical_fraction: f32,
    /// Spread constant K of the platform reflection fan
    pub platform_spread: f32,
    /// Velocity magnitude below which the per-tick update is skipped
    pub moving_threshold: f32,
    pub radius: f32,
    /// Position relative to the platform center while attached
    pub offset_on_platform: Vec2,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            initial_speed: BALL_INITIAL_SPEED,
            acceleration_per_second: BALL_ACCELERATION,
            max_speed: BALL_MAX_SPEED,
            min_vertical_fraction: BALL_MIN_VERTICAL_FRACTION,
            platform_spread: PLATFORM_SPREAD,
            moving_threshold: BALL_MOVING_THRESHOLD,
            radius: BALL_RADIUS,
            offset_on_platform: Vec2::new(0.0, PLATFORM_HALF_HEIGHT + BALL_RADIUS),
        }
    }
}

/// How the player steers the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputKind {
    /// Pointer drags, scaled by `sensitivity`
    #[default]
    TouchDrag,
    /// Held direction in `[-1, 1]`
    Axis,
}

/// Platform movement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub speed: f32,
    /// Pointer pixels to drag units
    pub sensitivity: f32,
    pub input: InputKind,
    pub half_extents: Vec2,
    pub start_position: Vec2,
    /// Clamp movement to the arena walls
    pub use_arena_bounds: bool,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            speed: PLATFORM_SPEED,
            sensitivity: PLATFORM_SENSITIVITY,
            input: InputKind::TouchDrag,
            half_extents: Vec2::new(PLATFORM_HALF_WIDTH, PLATFORM_HALF_HEIGHT),
            start_position: Vec2::new(0.0, PLATFORM_START_Y),
            use_arena_bounds: true,
        }
    }
}

/// Arena walls and loss region
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub half_width: f32,
    pub top: f32,
    /// The ball is lost once its center drops below this line
    pub loss_y: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            half_width: ARENA_HALF_WIDTH,
            top: ARENA_TOP,
            loss_y: LOSS_Y,
        }
    }
}

/// Points awarded per destroyed block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub sand: u32,
    pub stone: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            sand: SAND_SCORE,
            stone: STONE_SCORE,
        }
    }
}

impl ScoreTable {
    pub fn for_kind(&self, kind: BlockKind) -> u32 {
        match kind {
            BlockKind::Sand => self.sand,
            BlockKind::Stone => self.stone,
        }
    }
}

/// Complete gameplay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ball: BallTuning,
    pub platform: PlatformTuning,
    pub arena: ArenaTuning,
    pub scores: ScoreTable,
    pub starting_lives: u32,
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject parameter combinations the physics cannot honor.
    ///
    /// Comparisons are written so that NaN fails them.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ball = &self.ball;
        let platform = &self.platform;
        let arena = &self.arena;

        let floats = [
            ("ball.initial_speed", ball.initial_speed),
            ("ball.acceleration_per_second", ball.acceleration_per_second),
            ("ball.max_speed", ball.max_speed),
            ("ball.min_vertical_fraction", ball.min_vertical_fraction),
            ("ball.platform_spread", ball.platform_spread),
            ("ball.moving_threshold", ball.moving_threshold),
            ("ball.radius", ball.radius),
            ("ball.offset_on_platform.x", ball.offset_on_platform.x),
            ("ball.offset_on_platform.y", ball.offset_on_platform.y),
            ("platform.speed", platform.speed),
            ("platform.sensitivity", platform.sensitivity),
            ("platform.half_extents.x", platform.half_extents.x),
            ("platform.half_extents.y", platform.half_extents.y),
            ("platform.start_position.x", platform.start_position.x),
            ("platform.start_position.y", platform.start_position.y),
            ("arena.half_width", arena.half_width),
            ("arena.top", arena.top),
            ("arena.loss_y", arena.loss_y),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }

        if !(ball.initial_speed > 0.0) {
            return Err(invalid("ball.initial_speed must be positive"));
        }
        if !(ball.max_speed >= ball.initial_speed) {
            return Err(invalid("ball.max_speed must be at least ball.initial_speed"));
        }
        if !(ball.acceleration_per_second >= 0.0) {
            return Err(invalid("ball.acceleration_per_second must not be negative"));
        }
        if !(0.0..1.0).contains(&ball.min_vertical_fraction) {
            return Err(invalid("ball.min_vertical_fraction must be in [0, 1)"));
        }
        if !(ball.platform_spread > 0.0 && ball.platform_spread <= 2.0) {
            return Err(invalid("ball.platform_spread must be in (0, 2]"));
        }
        if !(ball.moving_threshold >= 0.0) {
            return Err(invalid("ball.moving_threshold must not be negative"));
        }
        if !(ball.radius > 0.0) {
            return Err(invalid("ball.radius must be positive"));
        }

        if !(platform.half_extents.x > 0.0 && platform.half_extents.y > 0.0) {
            return Err(invalid("platform.half_extents must be positive"));
        }
        if !(platform.speed >= 0.0) {
            return Err(invalid("platform.speed must not be negative"));
        }

        if !(arena.half_width > platform.half_extents.x) {
            return Err(invalid("arena.half_width must exceed the platform half width"));
        }
        if !(arena.loss_y < platform.start_position.y) {
            return Err(invalid("arena.loss_y must lie below the platform"));
        }
        if !(arena.top > platform.start_position.y) {
            return Err(invalid("arena.top must lie above the platform"));
        }

        if self.starting_lives == 0 {
            return Err(invalid("starting_lives must be at least 1"));
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball: BallTuning::default(),
            platform: PlatformTuning::default(),
            arena: ArenaTuning::default(),
            scores: ScoreTable::default(),
            starting_lives: STARTING_LIVES,
        }
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid(reason.to_string())
}

/// Placement of a single block in a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Authored block arrangement for one level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default)]
    pub name: String,
    pub blocks: Vec<BlockSpec>,
}

/// Block size used by the built-in layouts
const GRID_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 0.2);
const GRID_COLUMNS: usize = 8;
const GRID_PITCH: Vec2 = Vec2::new(1.1, 0.5);
const GRID_TOP_ROW_Y: f32 = 4.0;

impl LevelLayout {
    /// Parse a list of layouts from JSON
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ConfigError> {
        let layouts: Vec<LevelLayout> = serde_json::from_str(json)?;
        if layouts.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        Ok(layouts)
    }

    /// Load a list of layouts from a JSON file
    pub fn load_list(path: impl AsRef<Path>) -> Result<Vec<Self>, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layouts = Self::list_from_json(&json)?;
        log::info!("Loaded {} level layouts from {}", layouts.len(), path.display());
        Ok(layouts)
    }

    /// Build a centered grid, choosing each block's kind from its (row, column)
    pub fn grid(name: &str, rows: usize, kind_at: impl Fn(usize, usize) -> BlockKind) -> Self {
        let left = -GRID_PITCH.x * (GRID_COLUMNS as f32 - 1.0) / 2.0;
        let mut blocks = Vec::with_capacity(rows * GRID_COLUMNS);
        for row in 0..rows {
            for col in 0..GRID_COLUMNS {
                blocks.push(BlockSpec {
                    kind: kind_at(row, col),
                    center: Vec2::new(
                        left + col as f32 * GRID_PITCH.x,
                        GRID_TOP_ROW_Y - row as f32 * GRID_PITCH.y,
                    ),
                    half_extents: GRID_HALF_EXTENTS,
                });
            }
        }
        Self {
            name: name.to_string(),
            blocks,
        }
    }

    /// The three stock levels
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::grid("Level 1", 2, |_, _| BlockKind::Sand),
            Self::grid("Level 2", 3, |row, col| {
                if (row + col) % 2 == 0 {
                    BlockKind::Stone
                } else {
                    BlockKind::Sand
                }
            }),
            Self::grid("Level 3", 4, |row, _| {
                if row < 2 {
                    BlockKind::Stone
                } else {
                    BlockKind::Sand
                }
            }),
        ]
    }
}
