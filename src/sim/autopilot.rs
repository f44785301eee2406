//! Scripted player for headless runs
//!
//! Chases the ball with the platform and launches as soon as it can. A seeded
//! RNG jitters the launch angle and the spot on the platform it aims for, so
//! runs differ by seed yet replay exactly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::tick::{Game, TickInput};

/// Frames between re-rolls of the aim offset
const AIM_PERIOD: u32 = 90;
/// Distance at which the platform stops chasing
const DEAD_ZONE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    aim_offset: f32,
    frames: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            aim_offset: 0.0,
            frames: 0,
        }
    }

    /// Current aim offset from the platform center
    pub fn aim_offset(&self) -> f32 {
        self.aim_offset
    }

    /// Decide this frame's input
    pub fn input(&mut self, game: &Game) -> TickInput {
        if self.frames % AIM_PERIOD == 0 {
            let half_width = game.platform().rect().half_extents.x;
            self.aim_offset = self.rng.random_range(-0.7..=0.7) * half_width;
        }
        self.frames = self.frames.wrapping_add(1);

        let ball = game.ball();
        if !ball.is_launched() {
            let direction = Vec2::new(self.rng.random_range(-0.5..=0.5), 1.0);
            return TickInput {
                launch: true,
                launch_direction: Some(direction),
                ..Default::default()
            };
        }

        // Hit the ball off-center to steer it
        let target = ball.position().x - self.aim_offset;
        let error = target - game.platform().position().x;
        let drag_delta = if error.abs() < DEAD_ZONE {
            0.0
        } else {
            error.clamp(-1.0, 1.0)
        };
        TickInput {
            drag_delta,
            ..Default::default()
        }
    }
}
