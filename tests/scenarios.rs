//! End-to-end scenarios driven through the public API

use glam::Vec2;
use shadow_dimension::sim::{
    Boundary, Category, CombatState, CombatTimings, CombatantState, Direction, Entity, EntityId, EntityKind,
    Motion, Patrol, Quadrant, SpatialBody, TickInput, World, scale_factor,
};
use shadow_dimension::{LevelLoader, Tuning};

fn attack() -> TickInput {
    TickInput {
        attack: true,
        ..Default::default()
    }
}

#[test]
fn test_player_move_clamps_at_boundary_edge() {
    let boundary = Boundary::new(Vec2::ZERO, Vec2::new(104.0, 200.0));
    let mut body = SpatialBody::new(Vec2::new(100.0, 100.0), Vec2::new(40.0, 58.0));
    let mut motion = Motion::new(2.0, body.pos);

    let positions: Vec<Vec2> = (0..3)
        .map(|_| {
            motion.move_clamped(&mut body, Direction::Right.to_vec(), &boundary);
            body.pos
        })
        .collect();
    assert_eq!(
        positions,
        vec![
            Vec2::new(102.0, 100.0),
            Vec2::new(104.0, 100.0),
            Vec2::new(104.0, 100.0)
        ]
    );
}

#[test]
fn test_player_clamped_inside_world() {
    let mut world = World::new(
        Boundary::new(Vec2::ZERO, Vec2::new(104.0, 200.0)),
        Vec2::new(100.0, 100.0),
        Tuning::default(),
    );
    for _ in 0..3 {
        world.update(&TickInput::moving(Direction::Right));
    }
    assert_eq!(world.player.pos(), Vec2::new(104.0, 100.0));
}

#[test]
fn test_enemy_in_radius_attacks_to_the_right() {
    let mut world = World::new(
        Boundary::new(Vec2::ZERO, Vec2::new(1000.0, 700.0)),
        Vec2::new(100.0, 0.0),
        Tuning::default(),
    );
    let tuning = world.tuning.clone();
    let demon = Entity::enemy(
        EntityId(0),
        EntityKind::Demon,
        Vec2::ZERO,
        Patrol::new(Direction::Down.to_vec()),
        0.0,
        false,
        &tuning,
    );
    let id = world.push(demon);

    world.update(&TickInput::default());

    let demon = world.get(id).unwrap();
    assert_eq!(demon.combat.as_ref().unwrap().state(), CombatState::Attacking);
    assert_eq!(world.projectiles.len(), 1);
    let fire = &world.projectiles[0];
    assert_eq!(fire.quadrant, Quadrant::UpRight);
    assert_eq!(fire.rotation(), std::f32::consts::FRAC_PI_2);
    assert_eq!(fire.source, id);
}

#[test]
fn test_second_hit_during_invincibility_is_ignored() {
    let mut combatant = CombatantState::new(40, 10, CombatTimings::default());
    assert_eq!(combatant.take_damage(10, 10), 10);
    assert_eq!(combatant.health(), 30);
    assert_eq!(combatant.state(), CombatState::Invincible);

    // One frame later, well inside the 3 s window
    assert_eq!(combatant.take_damage(10, 11), 0);
    assert_eq!(combatant.health(), 30);
}

#[test]
fn test_attack_then_cooldown_then_attack_again() {
    let mut combatant = CombatantState::new(100, 20, CombatTimings::default());
    assert!(combatant.request_attack(0));

    combatant.update(59);
    assert!(combatant.is_attacking());
    combatant.update(60);
    assert_eq!(combatant.state(), CombatState::Idle);

    // Idle, but the 2 s cooldown is running
    assert!(!combatant.request_attack(61));
    combatant.update(179);
    assert!(!combatant.can_attack(179));
    combatant.update(180);
    assert!(combatant.request_attack(180));
}

#[test]
fn test_scale_factor_reference_points() {
    assert_eq!(scale_factor(0), 1.0);
    assert!((scale_factor(3) - 3.375).abs() < 1e-6);
    assert!((scale_factor(-3) - 0.125).abs() < 1e-6);
}

#[test]
fn test_sinkhole_consumed_once_through_world() {
    let mut world = World::new(
        Boundary::new(Vec2::ZERO, Vec2::new(1000.0, 700.0)),
        Vec2::new(100.0, 100.0),
        Tuning::default(),
    );
    let tuning = world.tuning.clone();
    world.push(Entity::sinkhole(EntityId(0), Vec2::new(141.0, 100.0), &tuning));

    world.update(&TickInput::moving(Direction::Right));
    assert_eq!(world.player_combat().health(), 70);
    assert_eq!(world.iter_category(Category::Sinkhole).count(), 0);

    // Walk back and forth across the old spot after invincibility ends
    for frame in 0..400 {
        let dir = if frame % 40 < 20 {
            Direction::Left
        } else {
            Direction::Right
        };
        world.update(&TickInput::moving(dir));
    }
    assert_eq!(world.player_combat().health(), 70);
}

#[test]
fn test_level_file_to_boss_fight() {
    let source = "\
Fae,100,100
Navec,90,130
Wall,400,400
Sinkhole,600,600
TopLeft,0,0
BottomRight,1000,700
";
    let tuning = Tuning::default();
    let level = LevelLoader::new(3, &tuning).parse(source).unwrap();
    let mut world = World::from_level(&level, tuning);
    assert_eq!(world.entities.len(), 3);

    // Freeze the boss so the fight is positional only
    let boss = world
        .entities
        .iter_mut()
        .find(|e| e.kind == EntityKind::Navec)
        .unwrap();
    boss.motion.as_mut().unwrap().base_speed = 0.0;
    boss.motion.as_mut().unwrap().rescale(1.0);
    boss.body.pos = Vec2::new(90.0, 130.0);

    // Four swings, each after the previous attack and cooldown have ended
    for _ in 0..4 {
        world.update(&attack());
        for _ in 0..200 {
            world.update(&TickInput::default());
            if world.boss_defeated() {
                break;
            }
        }
    }
    assert!(world.boss_defeated());
    assert!(world.iter_category(Category::Enemy).next().is_none());
    assert!(!world.is_player_dead());
}

#[test]
fn test_restart_resets_clock_and_timescale() {
    let mut world = World::new(
        Boundary::new(Vec2::ZERO, Vec2::new(1000.0, 700.0)),
        Vec2::new(100.0, 100.0),
        Tuning::default(),
    );
    world.update(&TickInput {
        speed_up: true,
        ..Default::default()
    });
    assert_eq!(world.frame(), 1);
    assert_eq!(world.timescale(), 1);

    world.reset_context();
    assert_eq!(world.frame(), 0);
    assert_eq!(world.timescale(), 0);
    assert_eq!(world.player.motion.unwrap().speed(), 2.0);
}
