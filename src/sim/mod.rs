//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one `tick` per frame)
//! - Stable iteration order (insertion order, preserved across removals)
//! - No rendering, input-device or file dependencies

pub mod ai;
pub mod body;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod state;
pub mod tick;
pub mod timescale;

pub use ai::{Patrol, Projectile, Quadrant, RangedAttack, aim_fire, in_attack_radius, patrol_step};
pub use body::{Boundary, Direction, Motion, SpatialBody};
pub use clock::{Clock, Frame, Timer};
pub use collision::{block, consume_sinkhole, find_all, find_first, intersects, melee, projectile_hit};
pub use combat::{CombatState, CombatTimings, CombatantState, HealthBand};
pub use state::{Category, Entity, EntityId, EntityKind, Hazard, SimContext, VisualPose, VisualState, World};
pub use tick::{TickInput, tick};
pub use timescale::{Timescale, scale_factor};
