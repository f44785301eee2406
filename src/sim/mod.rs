//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (autopilot)
//! - Stable iteration order (blocks in layout order)
//! - No rendering or platform dependencies
//!
//! Components share state through `Rc` and talk through [`Signal`]s. Every
//! subscriber holds a weak reference to its owner and unhooks itself on
//! teardown.

pub mod autopilot;
pub mod ball;
pub mod block;
pub mod collision;
pub mod completion;
pub mod events;
pub mod input;
pub mod level;
pub mod lives;
pub mod orchestrator;
pub mod platform;
pub mod score;
pub mod signal;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use ball::{Anchor, Ball, BallBody};
pub use block::{Block, BlockKind, HitOutcome};
pub use collision::{
    Aabb, BelowLine, CollisionResult, LossRegion, PlatformBounds, Walls, ball_aabb_collision,
    ball_wall_collision, reflect_velocity,
};
pub use completion::LevelCompletionTracker;
pub use events::{BlockDestroyed, EventBus};
pub use input::{AxisInput, DEFAULT_LAUNCH_DIRECTION, DragGesture, InputScheme, PointerEvent};
pub use level::Level;
pub use lives::LivesTracker;
pub use orchestrator::{LevelOrchestrator, OrchestratorParts};
pub use platform::{MoveBounds, MovementPolicy, Platform};
pub use score::ScoreTracker;
pub use signal::{Signal, SubscriptionId};
pub use state::{GameState, GameStateMachine};
pub use tick::{Frontend, Game, TickInput};
