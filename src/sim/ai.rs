//! Enemy behaviour: patrol with reflection, aggro radius, quadrant-aimed fire
//!
//! Demons walk in a straight line and turn around when they bump into a
//! barrier, a sinkhole, or the playfield edge. When the player is inside a
//! demon's attack radius the demon breathes fire from the corner of its box
//! that faces the player.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Boundary, Motion, SpatialBody};
use super::collision::any_intersecting;
use super::state::{Category, Entity, EntityId};
use crate::distance;

/// Straight-line patrol direction (unit vector)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub direction: Vec2,
}

impl Patrol {
    pub fn new(direction: Vec2) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

/// Ranged-attack capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedAttack {
    /// Centre-to-centre reach
    pub radius: f32,
    pub fire_size: Vec2,
}

/// Target position relative to the attacker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    UpLeft,
    DownLeft,
    UpRight,
    DownRight,
}

impl Quadrant {
    /// Classify `target` relative to `origin`; ties count as left / up
    pub fn classify(origin: Vec2, target: Vec2) -> Self {
        match (target.x <= origin.x, target.y <= origin.y) {
            (true, true) => Quadrant::UpLeft,
            (true, false) => Quadrant::DownLeft,
            (false, true) => Quadrant::UpRight,
            (false, false) => Quadrant::DownRight,
        }
    }

    /// Quarter turns applied to the fire sprite
    pub fn quarter_turns(self) -> u8 {
        match self {
            Quadrant::UpLeft => 0,
            Quadrant::UpRight => 1,
            Quadrant::DownRight => 2,
            Quadrant::DownLeft => 3,
        }
    }

    /// Sprite rotation in radians
    pub fn rotation(self) -> f32 {
        f32::from(self.quarter_turns()) * FRAC_PI_2
    }

    /// Top-left of a `fire_size` sprite placed just outside the matching corner of `body`
    pub fn anchor(self, body: &SpatialBody, fire_size: Vec2) -> Vec2 {
        match self {
            Quadrant::UpLeft => body.top_left() - fire_size,
            Quadrant::DownLeft => body.bottom_left() - Vec2::new(fire_size.x, 0.0),
            Quadrant::UpRight => body.top_right() - Vec2::new(0.0, fire_size.y),
            Quadrant::DownRight => body.bottom_right(),
        }
    }
}

/// A one-frame fire effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub source: EntityId,
    pub body: SpatialBody,
    pub quadrant: Quadrant,
    pub damage: u32,
}

impl Projectile {
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.quadrant.rotation()
    }
}

/// Whether `target`'s centre lies within `radius` of `attacker`'s centre
pub fn in_attack_radius(attacker: &SpatialBody, radius: f32, target: &SpatialBody) -> bool {
    distance(attacker.center(), target.center()) <= radius
}

/// Fire aimed at `target`, or `None` when out of range or not a ranged attacker
pub fn aim_fire(attacker: &Entity, target: &SpatialBody) -> Option<Projectile> {
    let ranged = attacker.ranged?;
    let damage = attacker.combat.as_ref()?.damage();
    if !in_attack_radius(&attacker.body, ranged.radius, target) {
        return None;
    }

    let quadrant = Quadrant::classify(attacker.body.top_left(), target.top_left());
    let pos = quadrant.anchor(&attacker.body, ranged.fire_size);
    Some(Projectile {
        source: attacker.id,
        body: SpatialBody::new(pos, ranged.fire_size),
        quadrant,
        damage,
    })
}

/// Advance one patrol step. On hitting a barrier, a sinkhole or the boundary
/// the direction flips and the body steps straight back, so it never rests
/// inside an obstacle. Returns true if the direction flipped.
pub fn patrol_step(
    body: &mut SpatialBody,
    motion: &mut Motion,
    patrol: &mut Patrol,
    obstacles: &[Entity],
    boundary: &Boundary,
) -> bool {
    if motion.speed() == 0.0 || patrol.direction == Vec2::ZERO {
        return false;
    }

    motion.move_by(body, patrol.direction);

    let blocked = !boundary.contains(body.pos)
        || any_intersecting(body, obstacles, Category::Barrier)
        || any_intersecting(body, obstacles, Category::Sinkhole);
    if !blocked {
        return false;
    }

    patrol.reverse();
    motion.bounce(body);
    true
}

/// Run one patrol step for every enemy in `entities`
pub fn patrol_all(entities: &mut [Entity], boundary: &Boundary) {
    for i in 0..entities.len() {
        let entity = &entities[i];
        let (Some(mut motion), Some(mut patrol)) = (entity.motion, entity.patrol) else {
            continue;
        };
        let mut body = entity.body;

        if patrol_step(&mut body, &mut motion, &mut patrol, entities, boundary) {
            log::trace!("{} {:?} turned around at {}", entities[i].kind.name(), entities[i].id, body.pos);
        }

        let entity = &mut entities[i];
        entity.body = body;
        entity.motion = Some(motion);
        entity.patrol = Some(patrol);
    }
}
