//! Game balance configuration
//!
//! Every constant the simulation reads lives here so a level can be replayed
//! with different balance from a JSON override.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::ms_to_frames;

/// Rejected balance settings
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("refresh_rate must be positive")]
    ZeroRefreshRate,
    #[error("timescale bounds [{min}, {max}] must include 0")]
    TimescaleBounds { min: i32, max: i32 },
    #[error("{0} must have a positive width and height")]
    BadSize(&'static str),
    #[error("demon speed range [{min}, {max}] is empty or negative")]
    SpeedRange { min: f32, max: f32 },
    #[error("player_speed must be finite and non-negative")]
    PlayerSpeed,
    #[error("{0} is too long to count in frames")]
    DurationOverflow(&'static str),
}

fn positive(size: Vec2) -> bool {
    size.is_finite() && size.x > 0.0 && size.y > 0.0
}

/// Stats for one kind of combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatantTuning {
    pub max_health: u32,
    pub damage: u32,
    /// Attack radius (centre to centre); zero for melee-only combatants
    pub attack_radius: f32,
    pub size: Vec2,
    /// Size of the projectile this combatant spawns
    pub fire_size: Vec2,
}

/// Game balance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Simulation ticks per second
    pub refresh_rate: u32,

    // === Combat timings ===
    pub attack_active_ms: u64,
    pub attack_cooldown_ms: u64,
    pub invincible_ms: u64,

    // === Combatants ===
    pub player: CombatantTuning,
    pub player_speed: f32,
    pub demon: CombatantTuning,
    pub navec: CombatantTuning,
    pub demon_speed_min: f32,
    pub demon_speed_max: f32,

    // === Stationary objects ===
    pub sinkhole_damage: u32,
    pub sinkhole_size: Vec2,
    pub wall_size: Vec2,
    pub tree_size: Vec2,

    // === Timescale ===
    pub timescale_min: i32,
    pub timescale_max: i32,

    /// Top-left corner of the goal region
    pub goal: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            refresh_rate: REFRESH_RATE,

            attack_active_ms: ATTACK_ACTIVE_MS,
            attack_cooldown_ms: ATTACK_COOLDOWN_MS,
            invincible_ms: INVINCIBLE_MS,

            player: CombatantTuning {
                max_health: PLAYER_MAX_HEALTH,
                damage: PLAYER_DAMAGE,
                attack_radius: 0.0,
                size: Vec2::from(PLAYER_SIZE),
                fire_size: Vec2::ZERO,
            },
            player_speed: PLAYER_SPEED,
            demon: CombatantTuning {
                max_health: DEMON_MAX_HEALTH,
                damage: DEMON_DAMAGE,
                attack_radius: DEMON_ATTACK_RADIUS,
                size: Vec2::from(DEMON_SIZE),
                fire_size: Vec2::from(DEMON_FIRE_SIZE),
            },
            navec: CombatantTuning {
                max_health: NAVEC_MAX_HEALTH,
                damage: NAVEC_DAMAGE,
                attack_radius: NAVEC_ATTACK_RADIUS,
                size: Vec2::from(NAVEC_SIZE),
                fire_size: Vec2::from(NAVEC_FIRE_SIZE),
            },
            demon_speed_min: DEMON_SPEED_MIN,
            demon_speed_max: DEMON_SPEED_MAX,

            sinkhole_damage: SINKHOLE_DAMAGE,
            sinkhole_size: Vec2::from(SINKHOLE_SIZE),
            wall_size: Vec2::from(WALL_SIZE),
            tree_size: Vec2::from(TREE_SIZE),

            timescale_min: TIMESCALE_MIN,
            timescale_max: TIMESCALE_MAX,

            goal: Vec2::new(GOAL_X, GOAL_Y),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {} fps, player hp {}, timescale [{}, {}]",
            tuning.refresh_rate,
            tuning.player.max_health,
            tuning.timescale_min,
            tuning.timescale_max
        );
        Ok(tuning)
    }

    /// Check every value the simulation would otherwise panic on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.refresh_rate == 0 {
            return Err(TuningError::ZeroRefreshRate);
        }
        if self.timescale_min > 0 || self.timescale_max < 0 {
            return Err(TuningError::TimescaleBounds {
                min: self.timescale_min,
                max: self.timescale_max,
            });
        }

        let sizes = [
            ("player.size", self.player.size),
            ("demon.size", self.demon.size),
            ("demon.fire_size", self.demon.fire_size),
            ("navec.size", self.navec.size),
            ("navec.fire_size", self.navec.fire_size),
            ("sinkhole_size", self.sinkhole_size),
            ("wall_size", self.wall_size),
            ("tree_size", self.tree_size),
        ];
        if let Some((name, _)) = sizes.into_iter().find(|&(_, size)| !positive(size)) {
            return Err(TuningError::BadSize(name));
        }

        let (min, max) = (self.demon_speed_min, self.demon_speed_max);
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
            return Err(TuningError::SpeedRange { min, max });
        }
        if !(self.player_speed.is_finite() && self.player_speed >= 0.0) {
            return Err(TuningError::PlayerSpeed);
        }

        let durations = [
            ("attack_active_ms", self.attack_active_ms),
            ("attack_cooldown_ms", self.attack_cooldown_ms),
            ("invincible_ms", self.invincible_ms),
        ];
        for (name, ms) in durations {
            if ms_to_frames(ms, self.refresh_rate).is_none() {
                return Err(TuningError::DurationOverflow(name));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference() {
        let tuning = Tuning::default();
        assert_eq!(tuning.refresh_rate, 60);
        assert_eq!(tuning.navec.max_health, 2 * tuning.demon.max_health);
        assert_eq!(tuning.navec.damage, 2 * tuning.demon.damage);
        assert_eq!(tuning.sinkhole_damage, 30);
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "refresh_rate": 30, "sinkhole_damage": 5 }"#).unwrap();
        assert_eq!(tuning.refresh_rate, 30);
        assert_eq!(tuning.sinkhole_damage, 5);
        // Untouched fields fall back to defaults
        assert_eq!(tuning.invincible_ms, INVINCIBLE_MS);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Json(_))));
    }

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_values_that_would_panic() {
        assert!(matches!(
            Tuning::from_json(r#"{ "timescale_min": 1 }"#),
            Err(TuningError::TimescaleBounds { min: 1, max: 3 })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "refresh_rate": 0 }"#),
            Err(TuningError::ZeroRefreshRate)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "wall_size": [0.0, 50.0] }"#),
            Err(TuningError::BadSize("wall_size"))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "demon_speed_min": 0.9, "demon_speed_max": 0.1 }"#),
            Err(TuningError::SpeedRange { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "player_speed": -1.0 }"#),
            Err(TuningError::PlayerSpeed)
        ));
        let huge = format!(r#"{{ "invincible_ms": {} }}"#, u64::MAX);
        assert!(matches!(
            Tuning::from_json(&huge),
            Err(TuningError::DurationOverflow("invincible_ms"))
        ));
    }
}
