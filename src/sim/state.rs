//! World state and entity records
//!
//! Entities are flat records with optional capability components rather than
//! a type hierarchy. The `World` owns the player, the ordered entity list, the
//! one-frame projectile list, and the simulation context.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{Patrol, Projectile, RangedAttack};
use super::body::{Boundary, Motion, SpatialBody};
use super::clock::{Clock, Frame};
use super::combat::{CombatState, CombatTimings, CombatantState, HealthBand};
use super::tick::{TickInput, tick};
use super::timescale::Timescale;
use crate::level::{EntityDescriptor, LevelData};
use crate::tuning::Tuning;

/// Stable identity of an entity within one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Concrete entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Demon,
    /// Boss demon; defeating it wins the game
    Navec,
    Wall,
    Tree,
    Sinkhole,
}

/// Collision classes used to filter queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// The player
    Hero,
    /// Demons of any strength
    Enemy,
    /// Immovable blockers
    Barrier,
    /// Single-use damage traps
    Sinkhole,
}

impl EntityKind {
    pub fn category(self) -> Category {
        match self {
            EntityKind::Player => Category::Hero,
            EntityKind::Demon | EntityKind::Navec => Category::Enemy,
            EntityKind::Wall | EntityKind::Tree => Category::Barrier,
            EntityKind::Sinkhole => Category::Sinkhole,
        }
    }

    #[inline]
    pub fn is_boss(self) -> bool {
        self == EntityKind::Navec
    }

    /// Display name used in damage logs
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Player => "Fae",
            EntityKind::Demon => "Demon",
            EntityKind::Navec => "Navec",
            EntityKind::Wall => "Wall",
            EntityKind::Tree => "Tree",
            EntityKind::Sinkhole => "Sinkhole",
        }
    }
}

/// Single-use damage source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub damage: u32,
}

/// A simulated object: a body plus whichever capabilities its kind needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub body: SpatialBody,
    pub motion: Option<Motion>,
    pub combat: Option<CombatantState>,
    pub patrol: Option<Patrol>,
    pub ranged: Option<RangedAttack>,
    pub hazard: Option<Hazard>,
}

/// Discrete visual state for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualPose {
    Idle,
    Attack,
    Invincible,
}

/// Everything the renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub facing_left: bool,
    pub pose: VisualPose,
    pub health_percentage: Option<u32>,
    pub health_band: Option<HealthBand>,
}

impl Entity {
    fn bare(id: EntityId, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            body: SpatialBody::new(pos, size),
            motion: None,
            combat: None,
            patrol: None,
            ranged: None,
            hazard: None,
        }
    }

    pub fn player(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        let stats = tuning.player;
        Self {
            motion: Some(Motion::new(tuning.player_speed, pos)),
            combat: Some(CombatantState::new(
                stats.max_health,
                stats.damage,
                CombatTimings::from(tuning),
            )),
            ..Self::bare(id, EntityKind::Player, pos, stats.size)
        }
    }

    /// A demon or Navec; the boss differs only in its stats
    pub fn enemy(
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        patrol: Patrol,
        speed: f32,
        facing_left: bool,
        tuning: &Tuning,
    ) -> Self {
        let stats = match kind {
            EntityKind::Navec => tuning.navec,
            EntityKind::Demon => tuning.demon,
            other => panic!("{other:?} is not an enemy kind"),
        };
        let mut motion = Motion::new(speed, pos);
        motion.facing_left = facing_left;
        Self {
            motion: Some(motion),
            combat: Some(CombatantState::new(
                stats.max_health,
                stats.damage,
                CombatTimings::from(tuning),
            )),
            patrol: Some(patrol),
            ranged: Some(RangedAttack {
                radius: stats.attack_radius,
                fire_size: stats.fire_size,
            }),
            ..Self::bare(id, kind, pos, stats.size)
        }
    }

    pub fn wall(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        Self::bare(id, EntityKind::Wall, pos, tuning.wall_size)
    }

    pub fn tree(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        Self::bare(id, EntityKind::Tree, pos, tuning.tree_size)
    }

    pub fn sinkhole(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            hazard: Some(Hazard {
                damage: tuning.sinkhole_damage,
            }),
            ..Self::bare(id, EntityKind::Sinkhole, pos, tuning.sinkhole_size)
        }
    }

    pub fn from_descriptor(id: EntityId, desc: &EntityDescriptor, tuning: &Tuning) -> Self {
        match desc.kind {
            EntityKind::Player => Self::player(id, desc.pos, tuning),
            EntityKind::Wall => Self::wall(id, desc.pos, tuning),
            EntityKind::Tree => Self::tree(id, desc.pos, tuning),
            EntityKind::Sinkhole => Self::sinkhole(id, desc.pos, tuning),
            kind @ (EntityKind::Demon | EntityKind::Navec) => {
                let params = desc.patrol.unwrap_or_default();
                Self::enemy(
                    id,
                    kind,
                    desc.pos,
                    Patrol::new(params.direction.to_vec()),
                    params.speed,
                    params.facing_left,
                    tuning,
                )
            }
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Combatants with zero health
    pub fn is_dead(&self) -> bool {
        self.combat.as_ref().is_some_and(CombatantState::is_dead)
    }

    pub fn is_invincible(&self) -> bool {
        self.combat.as_ref().is_some_and(CombatantState::is_invincible)
    }

    pub fn visual(&self) -> VisualState {
        let pose = match self.combat.as_ref().map(CombatantState::state) {
            Some(CombatState::Attacking) => VisualPose::Attack,
            Some(CombatState::Invincible) => VisualPose::Invincible,
            _ => VisualPose::Idle,
        };
        VisualState {
            id: self.id,
            kind: self.kind,
            pos: self.body.pos,
            size: self.body.size,
            facing_left: self.motion.is_some_and(|m| m.facing_left),
            pose,
            health_percentage: self.combat.as_ref().map(CombatantState::health_percentage),
            health_band: self.combat.as_ref().map(CombatantState::health_band),
        }
    }
}

/// Clock and timescale, passed explicitly into every system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimContext {
    pub clock: Clock,
    pub timescale: Timescale,
}

impl SimContext {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            clock: Clock::new(),
            timescale: Timescale::new(tuning.timescale_min, tuning.timescale_max),
        }
    }

    /// Level (re)start: frame zero, dial centred
    pub fn reset(&mut self) {
        self.clock.reset();
        self.timescale.reset();
    }

    #[inline]
    pub fn now(&self) -> Frame {
        self.clock.now()
    }
}

/// Complete simulation state for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub ctx: SimContext,
    pub tuning: Tuning,
    pub boundary: Boundary,
    /// The player lives outside `entities` so it stays queryable after death
    pub player: Entity,
    /// Everything else, in insertion order
    pub entities: Vec<Entity>,
    /// Projectiles spawned during the last update (one-frame lifetime)
    pub projectiles: Vec<Projectile>,
    pub(crate) boss_defeated: bool,
    /// Set the first frame the player stands in the goal region
    pub(crate) goal_reached: bool,
    next_id: u32,
}

impl World {
    /// Empty world with only the player
    pub fn new(boundary: Boundary, player_pos: Vec2, tuning: Tuning) -> Self {
        let ctx = SimContext::new(&tuning);
        let player = Entity::player(EntityId(0), player_pos, &tuning);
        Self {
            ctx,
            tuning,
            boundary,
            player,
            entities: Vec::new(),
            projectiles: Vec::new(),
            boss_defeated: false,
            goal_reached: false,
            next_id: 1,
        }
    }

    /// Build a world from parsed level data
    pub fn from_level(level: &LevelData, tuning: Tuning) -> Self {
        let mut world = Self::new(level.boundary, level.player, tuning);
        for desc in &level.entities {
            world.spawn(desc);
        }
        log::info!(
            "Level ready: {} entities, boundary {} .. {}",
            world.entities.len(),
            world.boundary.top_left,
            world.boundary.bottom_right
        );
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an entity built from a descriptor; the player kind moves the player instead
    pub fn spawn(&mut self, desc: &EntityDescriptor) -> EntityId {
        if desc.kind == EntityKind::Player {
            self.player = Entity::player(self.player.id, desc.pos, &self.tuning);
            return self.player.id;
        }
        let id = self.next_entity_id();
        let mut entity = Entity::from_descriptor(id, desc, &self.tuning);
        if let Some(motion) = entity.motion.as_mut() {
            motion.rescale(self.ctx.timescale.factor());
        }
        self.entities.push(entity);
        id
    }

    /// Push a pre-built entity (tests and custom levels)
    pub fn push(&mut self, mut entity: Entity) -> EntityId {
        entity.id = self.next_entity_id();
        if let Some(motion) = entity.motion.as_mut() {
            motion.rescale(self.ctx.timescale.factor());
        }
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Advance one simulation frame
    pub fn update(&mut self, input: &TickInput) {
        tick(self, input);
    }

    pub fn frame(&self) -> Frame {
        self.ctx.now()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn player_combat(&self) -> &CombatantState {
        match self.player.combat.as_ref() {
            Some(combat) => combat,
            None => panic!("player entity lost its combat state"),
        }
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.is_dead()
    }

    /// Player health for the HUD, 0..=100
    pub fn player_health_percentage(&self) -> u32 {
        self.player_combat().health_percentage()
    }

    /// Player's top-left corner is inside the goal region
    pub fn is_at_goal(&self) -> bool {
        let pos = self.player.pos();
        pos.x >= self.tuning.goal.x && pos.y >= self.tuning.goal.y
    }

    /// The player has reached the goal at least once this level
    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// A boss died and was removed this level
    pub fn boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    pub fn timescale(&self) -> i32 {
        self.ctx.timescale.value()
    }

    pub fn increase_timescale(&mut self) -> bool {
        let changed = self.ctx.timescale.increase();
        if changed {
            self.rescale_speeds();
        }
        changed
    }

    pub fn decrease_timescale(&mut self) -> bool {
        let changed = self.ctx.timescale.decrease();
        if changed {
            self.rescale_speeds();
        }
        changed
    }

    /// Apply the current timescale factor to every moving body
    pub fn rescale_speeds(&mut self) {
        let factor = self.ctx.timescale.factor();
        let movers = std::iter::once(&mut self.player).chain(self.entities.iter_mut());
        for motion in movers.filter_map(|e| e.motion.as_mut()) {
            motion.rescale(factor);
        }
    }

    /// Restart clock and timescale (level restart)
    pub fn reset_context(&mut self) {
        self.ctx.reset();
        self.rescale_speeds();
    }

    /// Entities in a category, in insertion order
    pub fn iter_category(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.category() == category)
    }

    /// Visual state of the player followed by every entity
    pub fn visuals(&self) -> Vec<VisualState> {
        std::iter::once(&self.player)
            .chain(self.entities.iter())
            .map(Entity::visual)
            .collect()
    }
}
