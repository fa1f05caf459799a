//! Collision queries and resolution policies
//!
//! Queries filter candidates by `Category` and test axis-aligned boxes.
//! Each policy applies one kind of interaction; the tick pipeline calls them
//! in a fixed order (sinkholes, barriers, projectiles, melee).

use super::ai::Projectile;
use super::body::SpatialBody;
use super::clock::Frame;
use super::state::{Category, Entity};

/// Boxes overlap (edges touching does not count)
#[inline]
pub fn intersects(a: &SpatialBody, b: &SpatialBody) -> bool {
    a.intersects(b)
}

/// Index of the first candidate in `category` overlapping `body`
pub fn find_first(body: &SpatialBody, candidates: &[Entity], category: Category) -> Option<usize> {
    candidates
        .iter()
        .position(|c| c.category() == category && intersects(body, &c.body))
}

/// Indices of every candidate in `category` overlapping `body`, in order
pub fn find_all(body: &SpatialBody, candidates: &[Entity], category: Category) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.category() == category && intersects(body, &c.body))
        .map(|(i, _)| i)
        .collect()
}

#[inline]
pub fn any_intersecting(body: &SpatialBody, candidates: &[Entity], category: Category) -> bool {
    find_first(body, candidates, category).is_some()
}

fn log_damage(source: &str, applied: u32, target: &Entity) {
    if let Some(combat) = target.combat.as_ref() {
        let name = target.kind.name();
        log::debug!(
            "{} inflicts {} damage points on {}. {}'s current health: {}/{}",
            source,
            applied,
            name,
            name,
            combat.health(),
            combat.max_health()
        );
    }
}

/// A non-invincible combatant stepping on a sinkhole takes its damage and the
/// sinkhole is removed for good. Returns the damage applied.
pub fn consume_sinkhole(target: &mut Entity, entities: &mut Vec<Entity>, now: Frame) -> Option<u32> {
    if target.is_invincible() {
        return None;
    }
    let combat = target.combat.as_mut()?;
    let idx = find_first(&target.body, entities, Category::Sinkhole)?;
    let damage = entities[idx].hazard.map_or(0, |h| h.damage);

    let applied = combat.take_damage(damage, now);
    let sinkhole = entities.remove(idx);
    log::debug!("Sinkhole {:?} consumed at {}", sinkhole.id, sinkhole.pos());
    log_damage(sinkhole.kind.name(), applied, target);
    Some(applied)
}

/// Revert a moving body that overlaps a barrier to its previous position
pub fn block(mover: &mut Entity, obstacles: &[Entity]) -> bool {
    let Some(motion) = mover.motion else {
        return false;
    };
    if !any_intersecting(&mover.body, obstacles, Category::Barrier) {
        return false;
    }
    motion.revert(&mut mover.body);
    true
}

/// Fire touching a non-invincible target deals its damage and leaves the
/// target invincible. Returns the damage applied.
pub fn projectile_hit(target: &mut Entity, projectile: &Projectile, source_name: &str, now: Frame) -> u32 {
    if target.is_invincible() || !intersects(&target.body, &projectile.body) {
        return 0;
    }
    let Some(combat) = target.combat.as_mut() else {
        return 0;
    };
    let applied = combat.take_damage(projectile.damage, now);
    combat.make_invincible(now);
    log_damage(source_name, applied, target);
    applied
}

/// While `attacker` is attacking, every overlapping non-invincible enemy takes
/// the attacker's damage rating. Returns the number of enemies hit.
pub fn melee(attacker: &Entity, entities: &mut [Entity], now: Frame) -> usize {
    let Some(damage) = attacker
        .combat
        .as_ref()
        .filter(|c| c.is_attacking())
        .map(|c| c.damage())
    else {
        return 0;
    };

    let mut hits = 0;
    for idx in find_all(&attacker.body, entities, Category::Enemy) {
        let target = &mut entities[idx];
        let Some(combat) = target.combat.as_mut() else {
            continue;
        };
        if combat.is_invincible() {
            continue;
        }
        let applied = combat.take_damage(damage, now);
        log_damage(attacker.kind.name(), applied, target);
        hits += 1;
    }
    hits
}
