//! Shadow Dimension - simulation core of a top-down action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, combat, enemy AI)
//! - `level`: Level-definition parsing into entity descriptors
//! - `tuning`: Data-driven game balance

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{EntityDescriptor, LevelData, LevelError, LevelLoader};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Reference tuning constants (the values behind `Tuning::default()`)
pub mod consts {
    /// Fixed simulation tick rate (frames per second)
    pub const REFRESH_RATE: u32 = 60;

    /// Combat timings (milliseconds)
    pub const ATTACK_ACTIVE_MS: u64 = 1000;
    pub const ATTACK_COOLDOWN_MS: u64 = 2000;
    pub const INVINCIBLE_MS: u64 = 3000;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const PLAYER_DAMAGE: u32 = 20;
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const PLAYER_SIZE: (f32, f32) = (40.0, 58.0);

    /// Regular demon
    pub const DEMON_ATTACK_RADIUS: f32 = 150.0;
    pub const DEMON_MAX_HEALTH: u32 = 40;
    pub const DEMON_DAMAGE: u32 = 10;
    pub const DEMON_SIZE: (f32, f32) = (50.0, 50.0);
    pub const DEMON_FIRE_SIZE: (f32, f32) = (30.0, 30.0);
    /// Aggressive demons roll a speed in this range; passive demons stand still
    pub const DEMON_SPEED_MIN: f32 = 0.2;
    pub const DEMON_SPEED_MAX: f32 = 0.7;

    /// Navec (boss) is a demon with doubled health and damage
    pub const NAVEC_ATTACK_RADIUS: f32 = 200.0;
    pub const NAVEC_MAX_HEALTH: u32 = 2 * DEMON_MAX_HEALTH;
    pub const NAVEC_DAMAGE: u32 = 2 * DEMON_DAMAGE;
    pub const NAVEC_SIZE: (f32, f32) = (70.0, 70.0);
    pub const NAVEC_FIRE_SIZE: (f32, f32) = (40.0, 40.0);

    /// Stationary objects
    pub const SINKHOLE_DAMAGE: u32 = 30;
    pub const SINKHOLE_SIZE: (f32, f32) = (40.0, 40.0);
    pub const WALL_SIZE: (f32, f32) = (50.0, 50.0);
    pub const TREE_SIZE: (f32, f32) = (45.0, 50.0);

    /// Timescale dial bounds (inclusive)
    pub const TIMESCALE_MIN: i32 = -3;
    pub const TIMESCALE_MAX: i32 = 3;
    /// Speed multiplier per dial step when speeding up / slowing down
    pub const TIMESCALE_UP_BASE: f32 = 1.5;
    pub const TIMESCALE_DOWN_BASE: f32 = 0.5;

    /// The player reaches the goal once its top-left corner is past this point
    pub const GOAL_X: f32 = 950.0;
    pub const GOAL_Y: f32 = 670.0;
}

/// Convert a millisecond duration into whole frames at the given tick rate.
/// `None` if the intermediate product overflows.
#[inline]
pub fn ms_to_frames(ms: u64, refresh_rate: u32) -> Option<u64> {
    ms.checked_mul(u64::from(refresh_rate)).map(|n| n / 1000)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}
