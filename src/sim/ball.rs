//! Ball physics
//!
//! The ball rides on the platform until launched, then travels at a scalar
//! speed that only grows (up to a cap). Velocity magnitude always equals that
//! speed while launched; collisions only change direction.

use std::cell::Cell;

use glam::Vec2;

use super::collision::{CollisionResult, LossRegion, PlatformBounds, reflect_velocity};
use super::signal::Signal;
use crate::settings::BallTuning;
use crate::{clamped_sqrt, with_sign_of};

/// Extra separation left after pushing out of an obstacle
const CONTACT_SKIN: f32 = 1e-4;

/// What the ball is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Riding on the platform at the configured offset
    Platform,
    /// Free-moving
    Detached,
}

/// Kinematic state of the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub launched: bool,
    pub anchor: Anchor,
    /// Last known platform position, used while anchored
    pub platform_origin: Vec2,
    /// Latch so the lost signal fires on entry only
    in_loss_region: bool,
}

#[derive(Debug)]
pub struct Ball {
    tuning: BallTuning,
    body: Cell<BallBody>,
    launched: Signal<()>,
    lost: Signal<()>,
}

impl Ball {
    /// Create a ball resting on a platform at `platform_origin`
    pub fn new(tuning: BallTuning, platform_origin: Vec2) -> Self {
        let body = BallBody {
            position: platform_origin + tuning.offset_on_platform,
            velocity: Vec2::ZERO,
            speed: 0.0,
            launched: false,
            anchor: Anchor::Platform,
            platform_origin,
            in_loss_region: false,
        };
        Self {
            tuning,
            body: Cell::new(body),
            launched: Signal::new(),
            lost: Signal::new(),
        }
    }

    pub fn tuning(&self) -> &BallTuning {
        &self.tuning
    }

    pub fn body(&self) -> BallBody {
        self.body.get()
    }

    pub fn position(&self) -> Vec2 {
        self.body.get().position
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.get().velocity
    }

    pub fn speed(&self) -> f32 {
        self.body.get().speed
    }

    pub fn is_launched(&self) -> bool {
        self.body.get().launched
    }

    pub fn radius(&self) -> f32 {
        self.tuning.radius
    }

    /// Fired once per launch
    pub fn on_launched(&self) -> &Signal<()> {
        &self.launched
    }

    /// Fired when the ball enters the loss region
    pub fn on_lost(&self) -> &Signal<()> {
        &self.lost
    }

    /// Track the platform; an anchored ball moves with it
    pub fn follow_platform(&self, platform_origin: Vec2) {
        let mut body = self.body.get();
        body.platform_origin = platform_origin;
        if body.anchor == Anchor::Platform {
            body.position = platform_origin + self.tuning.offset_on_platform;
        }
        self.body.set(body);
    }

    /// Detach from the platform and start moving along `direction`.
    ///
    /// Returns `false` (and changes nothing) if the ball is already launched
    /// or `direction` has no length.
    pub fn launch(&self, direction: Vec2) -> bool {
        let mut body = self.body.get();
        if body.launched {
            log::debug!("Launch ignored: ball already in play");
            return false;
        }
        let Some(direction) = direction.try_normalize() else {
            log::warn!("Launch ignored: zero-length direction");
            return false;
        };

        body.velocity = direction * self.tuning.initial_speed;
        body.speed = self.tuning.initial_speed;
        body.launched = true;
        body.anchor = Anchor::Detached;
        self.body.set(body);

        self.launched.emit(&());
        true
    }

    /// One fixed physics step: accelerate, keep the trajectory from going flat,
    /// then move.
    pub fn fixed_tick(&self, dt: f32) {
        let mut body = self.body.get();
        if !body.launched || body.velocity.length() < self.tuning.moving_threshold {
            return;
        }

        let dt = dt.max(0.0);
        body.speed = (body.speed + self.tuning.acceleration_per_second * dt)
            .min(self.tuning.max_speed)
            .max(body.speed);
        body.velocity = body.velocity.normalize() * body.speed;
        body.velocity = self.enforce_min_vertical(body.velocity, body.speed);
        body.position += body.velocity * dt;

        self.body.set(body);
    }

    /// Keep |vy| at or above `min_vertical_fraction * speed`, preserving signs
    fn enforce_min_vertical(&self, velocity: Vec2, speed: f32) -> Vec2 {
        let min_vy = self.tuning.min_vertical_fraction * speed;
        if velocity.y.abs() >= min_vy {
            return velocity;
        }
        let vx = clamped_sqrt(speed * speed - min_vy * min_vy);
        Vec2::new(with_sign_of(vx, velocity.x), with_sign_of(min_vy, velocity.y))
    }

    /// Push out of an obstacle and bounce off it. Only reflects when moving
    /// into the surface; returns whether it did.
    pub fn resolve_contact(&self, contact: &CollisionResult) -> bool {
        if !contact.hit {
            return false;
        }
        let mut body = self.body.get();
        body.position += contact.normal * (contact.penetration + CONTACT_SKIN);
        let approaching = body.velocity.dot(contact.normal) < 0.0;
        if approaching {
            body.velocity = reflect_velocity(body.velocity, contact.normal);
        }
        self.body.set(body);
        approaching
    }

    /// Exit angle keyed to where the ball touched the platform.
    ///
    /// Center hits go straight up, edge hits leave at mirror-image angles.
    pub fn reflect_from_platform(&self, contact_x: f32, platform: PlatformBounds) {
        let mut body = self.body.get();
        if !body.launched {
            return;
        }
        let hit_percent = if platform.width > f32::EPSILON {
            ((contact_x - platform.min_x) / platform.width).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let speed = body.speed;
        let vx = (hit_percent - 0.5) * speed * self.tuning.platform_spread;
        let vy = clamped_sqrt(speed * speed - vx * vx);
        body.velocity = Vec2::new(vx, vy);
        self.body.set(body);
    }

    /// Fire `lost` when the ball enters `region`. The ball itself is left
    /// alone; whoever listens decides whether to reset it.
    pub fn check_loss(&self, region: &dyn LossRegion) -> bool {
        let mut body = self.body.get();
        let inside = body.launched && region.contains(body.position);
        let entered = inside && !body.in_loss_region;
        body.in_loss_region = inside;
        self.body.set(body);

        if entered {
            self.lost.emit(&());
        }
        entered
    }

    /// Stop and re-attach to the platform
    pub fn reset(&self) {
        let mut body = self.body.get();
        body.launched = false;
        body.speed = 0.0;
        body.velocity = Vec2::ZERO;
        body.anchor = Anchor::Platform;
        body.position = body.platform_origin + self.tuning.offset_on_platform;
        body.in_loss_region = false;
        self.body.set(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::BelowLine;
    use proptest::prelude::*;
    use std::rc::Rc;

    const EPS: f32 = 1e-4;

    fn ball() -> Ball {
        Ball::new(BallTuning::default(), Vec2::new(0.0, -4.0))
    }

    fn launched_ball(direction: Vec2) -> Ball {
        let ball = ball();
        assert!(ball.launch(direction));
        ball
    }

    fn bounds() -> PlatformBounds {
        PlatformBounds {
            min_x: -1.0,
            width: 2.0,
        }
    }

    #[test]
    fn test_new_ball_rides_platform() {
        let ball = ball();
        let tuning = BallTuning::default();
        assert!(!ball.is_launched());
        assert_eq!(ball.body().anchor, Anchor::Platform);
        assert_eq!(ball.position(), Vec2::new(0.0, -4.0) + tuning.offset_on_platform);

        ball.follow_platform(Vec2::new(2.0, -4.0));
        assert_eq!(ball.position(), Vec2::new(2.0, -4.0) + tuning.offset_on_platform);
    }

    #[test]
    fn test_launch_normalizes_direction() {
        let ball = ball();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        ball.on_launched().connect(move |_| counter.set(counter.get() + 1));

        assert!(ball.launch(Vec2::new(0.0, 5.0)));
        assert_eq!(ball.speed(), BallTuning::default().initial_speed);
        assert!((ball.velocity() - Vec2::new(0.0, ball.speed())).length() < EPS);
        assert_eq!(ball.body().anchor, Anchor::Detached);
        assert_eq!(fired.get(), 1);

        // Second launch while in play is ignored
        assert!(!ball.launch(Vec2::Y));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_launch_rejects_zero_direction() {
        let ball = ball();
        assert!(!ball.launch(Vec2::ZERO));
        assert!(!ball.is_launched());
    }

    #[test]
    fn test_attached_ball_ignores_platform_moves_after_launch() {
        let ball = launched_ball(Vec2::Y);
        let before = ball.position();
        ball.follow_platform(Vec2::new(3.0, -4.0));
        assert_eq!(ball.position(), before);
    }

    #[test]
    fn test_tick_accelerates_and_keeps_magnitude() {
        let ball = launched_ball(Vec2::new(1.0, 1.0));
        ball.fixed_tick(1.0);
        let tuning = BallTuning::default();
        let expected = tuning.initial_speed + tuning.acceleration_per_second;
        assert!((ball.speed() - expected).abs() < EPS);
        assert!((ball.velocity().length() - expected).abs() < EPS);
    }

    #[test]
    fn test_tick_clamps_to_max_speed() {
        let ball = launched_ball(Vec2::Y);
        for _ in 0..100 {
            ball.fixed_tick(1.0);
        }
        assert_eq!(ball.speed(), BallTuning::default().max_speed);
    }

    #[test]
    fn test_tick_skipped_when_not_launched() {
        let ball = ball();
        let before = ball.body();
        ball.fixed_tick(0.5);
        assert_eq!(ball.body(), before);
    }

    #[test]
    fn test_min_vertical_correction_preserves_signs() {
        let ball = launched_ball(Vec2::new(-1.0, -0.01));
        ball.fixed_tick(0.0);

        let v = ball.velocity();
        let speed = ball.speed();
        let min_vy = BallTuning::default().min_vertical_fraction * speed;
        assert!((v.y - (-min_vy)).abs() < EPS);
        assert!(v.x < 0.0);
        assert!((v.length() - speed).abs() < EPS);
    }

    #[test]
    fn test_pure_horizontal_launch_gains_upward_component() {
        let ball = launched_ball(Vec2::X);
        ball.fixed_tick(0.0);
        let v = ball.velocity();
        // y == 0 counts as positive
        assert!(v.y > 0.0);
        assert!(v.x > 0.0);
    }

    #[test]
    fn test_center_hit_goes_straight_up() {
        let ball = launched_ball(Vec2::new(0.3, -1.0));
        ball.reflect_from_platform(0.0, bounds());
        let v = ball.velocity();
        assert!(v.x.abs() < EPS);
        assert!((v.y - ball.speed()).abs() < EPS);
    }

    #[test]
    fn test_edge_hits_are_mirror_images() {
        let left = launched_ball(Vec2::NEG_Y);
        left.reflect_from_platform(-1.0, bounds());
        let right = launched_ball(Vec2::NEG_Y);
        right.reflect_from_platform(1.0, bounds());

        let (l, r) = (left.velocity(), right.velocity());
        assert!(l.x < 0.0 && r.x > 0.0);
        assert!((l.x + r.x).abs() < EPS);
        assert!((l.y - r.y).abs() < EPS);
        assert!(l.y > 0.0);
        assert!((l.length() - left.speed()).abs() < EPS);
    }

    #[test]
    fn test_contact_outside_platform_clamps_to_edge() {
        let inside = launched_ball(Vec2::NEG_Y);
        inside.reflect_from_platform(1.0, bounds());
        let outside = launched_ball(Vec2::NEG_Y);
        outside.reflect_from_platform(7.0, bounds());
        assert_eq!(inside.velocity(), outside.velocity());
    }

    #[test]
    fn test_widest_spread_never_produces_nan() {
        let tuning = BallTuning {
            platform_spread: 2.0,
            ..BallTuning::default()
        };
        let ball = Ball::new(tuning, Vec2::ZERO);
        ball.launch(Vec2::NEG_Y);
        ball.reflect_from_platform(-1.0, bounds());
        let v = ball.velocity();
        assert!(v.y.is_finite());
        assert!(v.y.abs() < EPS);
    }

    #[test]
    fn test_resolve_contact_reflects_only_when_approaching() {
        let ball = launched_ball(Vec2::Y);
        let contact = CollisionResult {
            hit: true,
            point: Vec2::ZERO,
            normal: Vec2::NEG_Y,
            penetration: 0.05,
        };
        assert!(ball.resolve_contact(&contact));
        assert!(ball.velocity().y < 0.0);

        // Already moving away: direction untouched
        assert!(!ball.resolve_contact(&contact));
        assert!(ball.velocity().y < 0.0);
    }

    #[test]
    fn test_loss_fires_on_entry_only() {
        let ball = launched_ball(Vec2::NEG_Y);
        let lost = Rc::new(Cell::new(0));
        let counter = Rc::clone(&lost);
        ball.on_lost().connect(move |_| counter.set(counter.get() + 1));

        let region = BelowLine { y: -5.0 };
        for _ in 0..120 {
            ball.fixed_tick(1.0 / 60.0);
            ball.check_loss(&region);
        }
        assert_eq!(lost.get(), 1);
        // Losing does not touch the ball
        assert!(ball.is_launched());
    }

    #[test]
    fn test_unlaunched_ball_is_never_lost() {
        let ball = Ball::new(BallTuning::default(), Vec2::new(0.0, -10.0));
        assert!(!ball.check_loss(&BelowLine { y: -5.0 }));
    }

    #[test]
    fn test_reset_reattaches() {
        let ball = launched_ball(Vec2::new(1.0, 1.0));
        ball.fixed_tick(0.1);
        ball.follow_platform(Vec2::new(1.5, -4.0));
        ball.reset();

        let body = ball.body();
        assert!(!body.launched);
        assert_eq!(body.speed, 0.0);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.anchor, Anchor::Platform);
        assert_eq!(
            body.position,
            Vec2::new(1.5, -4.0) + BallTuning::default().offset_on_platform
        );
    }

    proptest! {
        #[test]
        fn prop_speed_never_decreases_or_exceeds_max(
            dts in prop::collection::vec(0.0f32..0.5, 1..200),
            dir_x in -1.0f32..1.0,
        ) {
            let ball = launched_ball(Vec2::new(dir_x, 1.0));
            let max = BallTuning::default().max_speed;
            let mut last = ball.speed();
            for dt in dts {
                ball.fixed_tick(dt);
                let speed = ball.speed();
                prop_assert!(speed >= last);
                prop_assert!(speed <= max);
                prop_assert!((ball.velocity().length() - speed).abs() < 1e-3);
                last = speed;
            }
        }

        #[test]
        fn prop_platform_reflection_always_upward(
            contact in -3.0f32..3.0,
            ticks in 0usize..50,
        ) {
            let ball = launched_ball(Vec2::NEG_Y);
            for _ in 0..ticks {
                ball.fixed_tick(0.1);
            }
            ball.reflect_from_platform(contact, bounds());
            let v = ball.velocity();
            prop_assert!(v.y > 0.0);
            prop_assert!((v.length() - ball.speed()).abs() < 1e-3);
        }
    }
}
