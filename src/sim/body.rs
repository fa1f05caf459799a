//! Spatial and movable bodies
//!
//! Every entity owns a `SpatialBody`: a top-left position plus a fixed size,
//! which together form its axis-aligned bounding box. Entities that move also
//! own a `Motion` carrying speed and the last valid position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box anchored at its top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialBody {
    pub pos: Vec2,
    pub size: Vec2,
}

impl SpatialBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "degenerate body size {size}");
        Self { pos, size }
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x, self.pos.y)
    }

    #[inline]
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y)
    }

    #[inline]
    pub fn bottom_right(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test: boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &SpatialBody) -> bool {
        let a_max = self.bottom_right();
        let b_max = other.bottom_right();
        self.pos.x < b_max.x && other.pos.x < a_max.x && self.pos.y < b_max.y && other.pos.y < a_max.y
    }
}

/// Rectangular playfield limit for body positions (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
}

impl Boundary {
    pub fn new(top_left: Vec2, bottom_right: Vec2) -> Self {
        Self {
            top_left: top_left.min(bottom_right),
            bottom_right: top_left.max(bottom_right),
        }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.top_left.x
            && point.x <= self.bottom_right.x
            && point.y >= self.top_left.y
            && point.y <= self.bottom_right.y
    }

    /// Clamp each axis independently to the nearest edge
    #[inline]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.top_left, self.bottom_right)
    }
}

/// Cardinal movement directions (screen space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector for this direction
    #[inline]
    pub fn to_vec(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }
}

/// Movement capability: speed scaled by the timescale plus the last valid position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Speed at timescale zero (pixels per frame)
    pub base_speed: f32,
    /// `base_speed * scale_factor(timescale)`
    speed: f32,
    /// Position before the most recent move; barriers revert to this
    previous: Vec2,
    /// Rendering hint derived from horizontal displacement
    pub facing_left: bool,
}

impl Motion {
    pub fn new(base_speed: f32, start: Vec2) -> Self {
        Self {
            base_speed,
            speed: base_speed,
            previous: start,
            facing_left: false,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    /// Recompute effective speed for a new timescale factor
    pub fn rescale(&mut self, factor: f32) {
        self.speed = self.base_speed * factor;
    }

    /// Move `body` by `direction * speed`, recording the prior position first
    pub fn move_by(&mut self, body: &mut SpatialBody, direction: Vec2) {
        let target = body.pos + direction * self.speed;
        self.move_to(body, target);
    }

    /// Move, then clamp any axis that left the boundary back onto its edge
    pub fn move_clamped(&mut self, body: &mut SpatialBody, direction: Vec2, boundary: &Boundary) {
        let target = boundary.clamp(body.pos + direction * self.speed);
        self.move_to(body, target);
    }

    fn move_to(&mut self, body: &mut SpatialBody, target: Vec2) {
        self.previous = body.pos;
        if target.x < body.pos.x {
            self.facing_left = true;
        } else if target.x > body.pos.x {
            self.facing_left = false;
        }
        body.pos = target;
    }

    /// Step straight back to the previous position, recording the blocked one
    pub fn bounce(&mut self, body: &mut SpatialBody) {
        let back = self.previous;
        self.move_to(body, back);
    }

    /// Put `body` back where it was before the last move
    pub fn revert(&self, body: &mut SpatialBody) {
        body.pos = self.previous;
    }
}
