//! The player's platform
//!
//! Movement is shared policy (speed scaling plus wall clamping); how the
//! horizontal delta is produced lives in `input`.

use std::cell::Cell;

use glam::Vec2;

use super::collision::{Aabb, PlatformBounds};
use super::signal::Signal;
use crate::settings::{ArenaTuning, PlatformTuning};

/// Horizontal limits for the platform center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBounds {
    pub left: f32,
    pub right: f32,
}

impl MoveBounds {
    /// Keep a platform of `half_width` fully inside an arena of `arena_half_width`
    pub fn inside_arena(arena_half_width: f32, half_width: f32) -> Self {
        Self {
            left: -arena_half_width + half_width,
            right: arena_half_width - half_width,
        }
    }
}

/// Shared movement rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementPolicy {
    pub speed: f32,
    pub bounds: Option<MoveBounds>,
}

impl MovementPolicy {
    pub fn from_tuning(platform: &PlatformTuning, arena: &ArenaTuning) -> Self {
        let bounds = platform
            .use_arena_bounds
            .then(|| MoveBounds::inside_arena(arena.half_width, platform.half_extents.x));
        Self {
            speed: platform.speed,
            bounds,
        }
    }

    /// New x after moving by `delta` for `dt` seconds
    pub fn step(&self, x: f32, delta: f32, dt: f32) -> f32 {
        let x = x + delta * self.speed * dt;
        match self.bounds {
            Some(bounds) => x.clamp(bounds.left, bounds.right),
            None => x,
        }
    }
}

#[derive(Debug)]
pub struct Platform {
    policy: Cell<MovementPolicy>,
    half_extents: Vec2,
    start_position: Vec2,
    position: Cell<Vec2>,
    moved: Signal<f32>,
}

impl Platform {
    pub fn new(tuning: &PlatformTuning, arena: &ArenaTuning) -> Self {
        Self {
            policy: Cell::new(MovementPolicy::from_tuning(tuning, arena)),
            half_extents: tuning.half_extents,
            start_position: tuning.start_position,
            position: Cell::new(tuning.start_position),
            moved: Signal::new(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position.get()
    }

    pub fn policy(&self) -> MovementPolicy {
        self.policy.get()
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.position.get(), self.half_extents)
    }

    /// Extent consumed by the ball's reflection model
    pub fn bounds(&self) -> PlatformBounds {
        PlatformBounds::from(&self.rect())
    }

    /// Move by an already sensitivity-scaled horizontal delta. Zero is a no-op.
    pub fn move_by(&self, delta: f32, dt: f32) -> bool {
        if delta == 0.0 {
            return false;
        }
        let mut position = self.position.get();
        position.x = self.policy.get().step(position.x, delta, dt);
        self.position.set(position);
        self.moved.emit(&delta);
        true
    }

    pub fn reset_position(&self) {
        self.position.set(self.start_position);
    }

    /// Recompute wall limits after the arena changed size
    pub fn recalculate_bounds(&self, arena_half_width: f32) {
        let mut policy = self.policy.get();
        policy.bounds = Some(MoveBounds::inside_arena(arena_half_width, self.half_extents.x));
        self.policy.set(policy);
    }

    /// Fired with the raw delta after every move
    pub fn on_moved(&self) -> &Signal<f32> {
        &self.moved
    }
}
