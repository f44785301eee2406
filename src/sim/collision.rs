//! Collision detection and response for axis-aligned geometry
//!
//! Everything in the arena is a box: walls, blocks and the platform. The ball
//! is a circle, so each test is circle-vs-box with the surface normal pointing
//! from the box toward the ball.

use glam::Vec2;

use crate::with_sign_of;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Horizontal extent of the platform, consumed by the reflection model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformBounds {
    pub min_x: f32,
    pub width: f32,
}

impl From<&Aabb> for PlatformBounds {
    fn from(rect: &Aabb) -> Self {
        Self {
            min_x: rect.min().x,
            width: rect.width(),
        }
    }
}

/// Region whose entry by the ball costs a life
pub trait LossRegion {
    fn contains(&self, point: Vec2) -> bool;
}

/// Everything strictly below a horizontal line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BelowLine {
    pub y: f32,
}

impl LossRegion for BelowLine {
    fn contains(&self, point: Vec2) -> bool {
        point.y < self.y
    }
}

impl LossRegion for Aabb {
    fn contains(&self, point: Vec2) -> bool {
        self.contains_point(point)
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the obstacle surface
    pub point: Vec2,
    /// Surface normal pointing toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a box
pub fn ball_aabb_collision(ball_pos: Vec2, ball_radius: f32, rect: &Aabb) -> CollisionResult {
    let closest = ball_pos.clamp(rect.min(), rect.max());
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    // Touching is not overlapping
    if dist_sq >= ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center is inside the box: push out along the shallowest axis
    let local = ball_pos - rect.center;
    let depth = rect.half_extents - local.abs();
    if depth.x < depth.y {
        let normal = Vec2::new(with_sign_of(1.0, local.x), 0.0);
        CollisionResult {
            hit: true,
            point: Vec2::new(rect.center.x + normal.x * rect.half_extents.x, ball_pos.y),
            normal,
            penetration: depth.x + ball_radius,
        }
    } else {
        let normal = Vec2::new(0.0, with_sign_of(1.0, local.y));
        CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, rect.center.y + normal.y * rect.half_extents.y),
            normal,
            penetration: depth.y + ball_radius,
        }
    }
}

/// Arena walls: left, right and top. The bottom is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walls {
    pub half_width: f32,
    pub top: f32,
}

/// Check collision with the arena walls (normal points back into the arena)
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32, walls: &Walls) -> CollisionResult {
    let left = -walls.half_width;
    let right = walls.half_width;

    if ball_pos.x - ball_radius <= left {
        return CollisionResult {
            hit: true,
            point: Vec2::new(left, ball_pos.y),
            normal: Vec2::X,
            penetration: left - (ball_pos.x - ball_radius),
        };
    }
    if ball_pos.x + ball_radius >= right {
        return CollisionResult {
            hit: true,
            point: Vec2::new(right, ball_pos.y),
            normal: Vec2::NEG_X,
            penetration: ball_pos.x + ball_radius - right,
        };
    }
    if ball_pos.y + ball_radius >= walls.top {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, walls.top),
            normal: Vec2::NEG_Y,
            penetration: ball_pos.y + ball_radius - walls.top,
        };
    }
    CollisionResult::miss()
}

/// Reflect a velocity about a surface normal
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_aabb_collision_from_below() {
        let rect = Aabb::new(Vec2::new(0.0, 3.0), Vec2::new(0.5, 0.2));
        let result = ball_aabb_collision(Vec2::new(0.0, 2.7), 0.2, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_ball_aabb_collision_corner() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let result = ball_aabb_collision(Vec2::new(1.1, 1.1), 0.2, &rect);
        assert!(result.hit);
        assert!(result.normal.x > 0.0 && result.normal.y > 0.0);
        assert!((result.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ball_aabb_collision_miss() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        assert!(!ball_aabb_collision(Vec2::new(2.0, 0.0), 0.5, &rect).hit);
    }

    #[test]
    fn test_ball_center_inside_box_pushes_out_shallowest_axis() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 0.5));
        let result = ball_aabb_collision(Vec2::new(0.3, 0.4), 0.1, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_wall_collision() {
        let walls = Walls {
            half_width: 5.0,
            top: 5.0,
        };
        assert!(!ball_wall_collision(Vec2::ZERO, 0.2, &walls).hit);
        assert_eq!(ball_wall_collision(Vec2::new(-4.9, 0.0), 0.2, &walls).normal, Vec2::X);
        assert_eq!(ball_wall_collision(Vec2::new(4.9, 0.0), 0.2, &walls).normal, Vec2::NEG_X);
        assert_eq!(ball_wall_collision(Vec2::new(0.0, 4.9), 0.2, &walls).normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(3.0, 4.0);
        let reflected = reflect_velocity(velocity, Vec2::NEG_X);
        assert!((reflected.x - (-3.0)).abs() < 1e-5);
        assert!((reflected.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_loss_regions() {
        let line = BelowLine { y: -5.0 };
        assert!(line.contains(Vec2::new(0.0, -5.1)));
        assert!(!line.contains(Vec2::new(0.0, -5.0)));

        let zone = Aabb::new(Vec2::new(0.0, -6.0), Vec2::new(5.0, 0.5));
        assert!(LossRegion::contains(&zone, Vec2::new(1.0, -6.2)));
        assert!(!LossRegion::contains(&zone, Vec2::new(1.0, -4.0)));
    }

    #[test]
    fn test_platform_bounds_from_rect() {
        let rect = Aabb::new(Vec2::new(1.0, -4.0), Vec2::new(1.0, 0.2));
        let bounds = PlatformBounds::from(&rect);
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.width, 2.0);
    }
}
