//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one frame. Phases run in a fixed
//! order: input, movement, sinkholes, barriers, melee, enemy fire, death
//! cleanup, goal check, state timers. Attacks resolve from post-barrier
//! positions, and the player's swing lands before enemy fire can interrupt it.

use serde::{Deserialize, Serialize};

use super::ai::{aim_fire, patrol_all};
use super::body::Direction;
use super::clock::Frame;
use super::collision::{block, consume_sinkhole, melee, projectile_hit};
use super::state::World;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement keys held down
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Attack key pressed this frame
    pub attack: bool,
    /// Timescale keys pressed this frame
    pub speed_up: bool,
    pub slow_down: bool,
}

impl TickInput {
    /// The single direction the player moves this frame: left, right, up, down priority
    pub fn direction(&self) -> Option<Direction> {
        if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }

    pub fn moving(direction: Direction) -> Self {
        Self {
            left: direction == Direction::Left,
            right: direction == Direction::Right,
            up: direction == Direction::Up,
            down: direction == Direction::Down,
            ..Default::default()
        }
    }
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput) {
    // Nothing moves once the player is dead; the screen layer takes over
    if world.is_player_dead() {
        return;
    }

    let now = world.ctx.clock.advance();

    if input.speed_up {
        world.increase_timescale();
    } else if input.slow_down {
        world.decrease_timescale();
    }

    if input.attack {
        if let Some(combat) = world.player.combat.as_mut() {
            combat.request_attack(now);
        }
    }

    move_player(world, input);
    patrol_all(&mut world.entities, &world.boundary);

    consume_sinkhole(&mut world.player, &mut world.entities, now);
    block(&mut world.player, &world.entities);

    melee(&world.player, &mut world.entities, now);
    enemies_attack(world, now);

    remove_dead(world);
    check_goal(world);
    update_states(world, now);
}

fn move_player(world: &mut World, input: &TickInput) {
    let Some(direction) = input.direction() else {
        return;
    };
    let player = &mut world.player;
    if let Some(motion) = player.motion.as_mut() {
        motion.move_clamped(&mut player.body, direction.to_vec(), &world.boundary);
    }
}

/// Every enemy with the player in range enters `Attacking` and breathes fire.
/// Fire lives for this frame only.
fn enemies_attack(world: &mut World, now: Frame) {
    world.projectiles.clear();

    for enemy in world.entities.iter_mut().filter(|e| !e.is_dead()) {
        let Some(fire) = aim_fire(enemy, &world.player.body) else {
            continue;
        };
        if let Some(combat) = enemy.combat.as_mut() {
            combat.request_attack(now);
        }
        projectile_hit(&mut world.player, &fire, enemy.kind.name(), now);
        world.projectiles.push(fire);
    }
}

fn remove_dead(world: &mut World) {
    let mut boss_down = false;
    world.entities.retain(|e| {
        if !e.is_dead() {
            return true;
        }
        log::debug!("{} {:?} died at {}", e.kind.name(), e.id, e.pos());
        boss_down |= e.kind.is_boss();
        false
    });

    if boss_down && !world.boss_defeated {
        log::info!("Boss defeated at frame {}", world.frame());
        world.boss_defeated = true;
    }
    if world.is_player_dead() {
        log::info!("Player died at frame {}", world.frame());
    }
}

fn check_goal(world: &mut World) {
    if !world.goal_reached && world.is_at_goal() {
        log::info!("Goal reached at frame {}", world.frame());
        world.goal_reached = true;
    }
}

fn update_states(world: &mut World, now: Frame) {
    let combatants = std::iter::once(&mut world.player).chain(world.entities.iter_mut());
    for combat in combatants.filter_map(|e| e.combat.as_mut()) {
        combat.update(now);
    }
}
