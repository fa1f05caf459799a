//! Combatant health and the Idle/Attacking/Invincible state machine
//!
//! Shared by the player and every demon. The state and its timer change only
//! through `transition`, so each re-arm point is visible in one place.
//!
//! ```text
//!            request_attack             active timer expires
//!   Idle ───────────────────► Attacking ─────────────────────► Idle (+ cooldown)
//!    │                           │
//!    │ take_damage               │ take_damage (attack cut short, cooldown armed)
//!    ▼                           ▼
//!   Invincible ◄─────────────────┘
//!    │ invincibility timer expires
//!    ▼
//!   Idle
//! ```

use serde::{Deserialize, Serialize};

use super::clock::{Frame, Timer};
use crate::tuning::Tuning;

/// Externally visible combat state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Idle,
    Attacking,
    Invincible,
}

/// Durations driving the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTimings {
    pub active_ms: u64,
    pub cooldown_ms: u64,
    pub invincible_ms: u64,
    pub refresh_rate: u32,
}

impl From<&Tuning> for CombatTimings {
    fn from(tuning: &Tuning) -> Self {
        Self {
            active_ms: tuning.attack_active_ms,
            cooldown_ms: tuning.attack_cooldown_ms,
            invincible_ms: tuning.invincible_ms,
            refresh_rate: tuning.refresh_rate,
        }
    }
}

impl Default for CombatTimings {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

/// HUD colour band for a health percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    /// 65..=100
    High,
    /// 35..65
    Medium,
    /// 0..35
    Low,
}

impl HealthBand {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            65.. => HealthBand::High,
            35..65 => HealthBand::Medium,
            _ => HealthBand::Low,
        }
    }
}

/// Health, damage rating and timed combat state of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    health: u32,
    max_health: u32,
    damage: u32,
    state: CombatState,
    /// Attack window while `Attacking`, invincibility while `Invincible`, unset while `Idle`
    timer: Option<Timer>,
    /// Post-attack cooldown; runs independently of `state`
    cooldown: Option<Timer>,
    timings: CombatTimings,
}

impl CombatantState {
    pub fn new(max_health: u32, damage: u32, timings: CombatTimings) -> Self {
        Self {
            health: max_health,
            max_health,
            damage,
            state: CombatState::Idle,
            timer: None,
            cooldown: None,
            timings,
        }
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Damage dealt per hit
    #[inline]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    #[inline]
    pub fn state(&self) -> CombatState {
        self.state
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.state == CombatState::Invincible
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.state == CombatState::Attacking
    }

    /// Set health, clamped to `[0, max_health]`
    pub fn set_health(&mut self, health: i64) {
        self.health = health.clamp(0, i64::from(self.max_health)) as u32;
    }

    /// `round(100 * health / max_health)`
    pub fn health_percentage(&self) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        (100.0 * self.health as f64 / self.max_health as f64).round() as u32
    }

    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_percentage(self.health_percentage())
    }

    /// Idle with no cooldown running
    pub fn can_attack(&self, now: Frame) -> bool {
        self.state == CombatState::Idle && self.cooldown.is_none_or(|t| t.is_expired(now))
    }

    /// Enter `Attacking` if allowed. Re-requesting while attacking keeps the
    /// running timer.
    pub fn request_attack(&mut self, now: Frame) -> bool {
        if !self.can_attack(now) {
            return false;
        }
        self.transition(CombatState::Attacking, now);
        true
    }

    /// Apply `amount` damage unless invincible. Returns the damage applied.
    pub fn take_damage(&mut self, amount: u32, now: Frame) -> u32 {
        if self.is_invincible() || amount == 0 {
            return 0;
        }
        let before = self.health;
        self.set_health(i64::from(self.health) - i64::from(amount));
        self.transition(CombatState::Invincible, now);
        before - self.health
    }

    /// Force invincibility (no-op if already invincible)
    pub fn make_invincible(&mut self, now: Frame) {
        if !self.is_invincible() {
            self.transition(CombatState::Invincible, now);
        }
    }

    /// Expire timers that have run out
    pub fn update(&mut self, now: Frame) {
        let expired = self.timer.is_some_and(|t| t.is_expired(now));
        if expired && self.state != CombatState::Idle {
            self.transition(CombatState::Idle, now);
        }
        if self.cooldown.is_some_and(|t| t.is_expired(now)) {
            self.cooldown = None;
        }
    }

    /// Frames until the active timer expires, if any
    pub fn timer_remaining(&self, now: Frame) -> Option<u64> {
        self.timer.map(|t| t.remaining(now))
    }

    fn arm(&self, now: Frame, duration_ms: u64) -> Timer {
        Timer::arm(now, duration_ms, self.timings.refresh_rate)
    }

    /// Single entry point for state changes.
    ///
    /// # Panics
    /// Panics on a transition outside the state machine; callers gate every
    /// transition, so reaching one is a logic bug.
    fn transition(&mut self, next: CombatState, now: Frame) {
        use CombatState::*;

        match (self.state, next) {
            (Idle, Attacking) => {
                self.timer = Some(self.arm(now, self.timings.active_ms));
            }
            (Attacking, Idle) => {
                self.timer = None;
                self.cooldown = Some(self.arm(now, self.timings.cooldown_ms));
            }
            (Attacking, Invincible) => {
                self.cooldown = Some(self.arm(now, self.timings.cooldown_ms));
                self.timer = Some(self.arm(now, self.timings.invincible_ms));
            }
            (Idle, Invincible) => {
                self.timer = Some(self.arm(now, self.timings.invincible_ms));
            }
            (Invincible, Idle) => {
                self.timer = None;
            }
            (from, to) => panic!("illegal combat transition {from:?} -> {to:?}"),
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demon() -> CombatantState {
        CombatantState::new(40, 10, CombatTimings::default())
    }

    #[test]
    fn test_damage_grants_invincibility() {
        let mut c = demon();
        assert_eq!(c.take_damage(10, 100), 10);
        assert_eq!(c.health(), 30);
        assert_eq!(c.state(), CombatState::Invincible);

        // A second hit within the 3 s window is ignored
        assert_eq!(c.take_damage(10, 101), 0);
        assert_eq!(c.health(), 30);
    }

    #[test]
    fn test_invincibility_expires_after_180_frames() {
        let mut c = demon();
        c.take_damage(10, 0);
        c.update(179);
        assert!(c.is_invincible());
        c.update(180);
        assert_eq!(c.state(), CombatState::Idle);
        assert_eq!(c.take_damage(10, 181), 10);
        assert_eq!(c.health(), 20);
    }

    #[test]
    fn test_health_clamps_at_zero() {
        let mut c = demon();
        assert_eq!(c.take_damage(100, 0), 40);
        assert_eq!(c.health(), 0);
        assert!(c.is_dead());
        c.set_health(500);
        assert_eq!(c.health(), 40);
        c.set_health(-5);
        assert_eq!(c.health(), 0);
    }

    #[test]
    fn test_zero_damage_is_noop() {
        let mut c = demon();
        assert_eq!(c.take_damage(0, 0), 0);
        assert_eq!(c.state(), CombatState::Idle);
    }

    #[test]
    fn test_attack_cycle() {
        let mut c = demon();
        assert!(c.request_attack(0));
        assert!(c.is_attacking());

        // Re-requesting does not reset the timer
        assert!(!c.request_attack(30));
        assert_eq!(c.timer_remaining(30), Some(30));

        c.update(59);
        assert!(c.is_attacking());
        c.update(60);
        assert_eq!(c.state(), CombatState::Idle);

        // Cooldown: 2 s after the attack window closed
        assert!(!c.request_attack(61));
        assert!(!c.request_attack(179));
        assert!(c.request_attack(180));
    }

    #[test]
    fn test_damage_interrupts_attack_and_starts_cooldown() {
        let mut c = demon();
        c.request_attack(0);
        c.take_damage(5, 10);
        assert!(c.is_invincible());
        c.update(190);
        assert_eq!(c.state(), CombatState::Idle);
        // Cooldown armed at frame 10 ends at 130, so attacking is allowed again
        assert!(c.request_attack(190));
    }

    #[test]
    fn test_cannot_attack_while_invincible() {
        let mut c = demon();
        c.take_damage(5, 0);
        assert!(!c.request_attack(1));
        assert!(c.is_invincible());
    }

    #[test]
    fn test_health_percentage_rounds() {
        let mut c = CombatantState::new(3, 1, CombatTimings::default());
        c.set_health(2);
        assert_eq!(c.health_percentage(), 67);
        assert_eq!(c.health_band(), HealthBand::High);
        c.set_health(1);
        assert_eq!(c.health_percentage(), 33);
        assert_eq!(c.health_band(), HealthBand::Low);
    }

    #[test]
    fn test_health_bands() {
        assert_eq!(HealthBand::from_percentage(100), HealthBand::High);
        assert_eq!(HealthBand::from_percentage(65), HealthBand::High);
        assert_eq!(HealthBand::from_percentage(64), HealthBand::Medium);
        assert_eq!(HealthBand::from_percentage(35), HealthBand::Medium);
        assert_eq!(HealthBand::from_percentage(34), HealthBand::Low);
        assert_eq!(HealthBand::from_percentage(0), HealthBand::Low);
    }

    #[test]
    #[should_panic(expected = "illegal combat transition")]
    fn test_illegal_transition_panics() {
        let mut c = demon();
        c.take_damage(5, 0);
        c.transition(CombatState::Attacking, 1);
    }
}
