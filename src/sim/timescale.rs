//! Global time-dilation dial
//!
//! An integer dial in `[min, max]`; each step speeds movers up by 1.5x or
//! slows them down by 0.5x. Moving the dial triggers a rescale pass over
//! every moving body (see `World::rescale_speeds`).

use serde::{Deserialize, Serialize};

use crate::consts::{TIMESCALE_DOWN_BASE, TIMESCALE_MAX, TIMESCALE_MIN, TIMESCALE_UP_BASE};

/// Speed multiplier for a dial setting
///
/// `1.5^n` for `n >= 0`, `0.5^|n|` for `n < 0`.
#[inline]
pub fn scale_factor(n: i32) -> f32 {
    if n >= 0 {
        TIMESCALE_UP_BASE.powi(n)
    } else {
        TIMESCALE_DOWN_BASE.powi(n.abs())
    }
}

/// Bounded timescale dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timescale {
    value: i32,
    min: i32,
    max: i32,
}

impl Default for Timescale {
    fn default() -> Self {
        Self::new(TIMESCALE_MIN, TIMESCALE_MAX)
    }
}

impl Timescale {
    pub fn new(min: i32, max: i32) -> Self {
        assert!(min <= 0 && 0 <= max, "timescale bounds must straddle zero");
        Self { value: 0, min, max }
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Current speed multiplier
    #[inline]
    pub fn factor(&self) -> f32 {
        scale_factor(self.value)
    }

    /// Step the dial up; returns false (and changes nothing) at the upper bound
    pub fn increase(&mut self) -> bool {
        if self.value >= self.max {
            return false;
        }
        self.value += 1;
        log::info!("Sped up, speed: {}", self.value);
        true
    }

    /// Step the dial down; returns false (and changes nothing) at the lower bound
    pub fn decrease(&mut self) -> bool {
        if self.value <= self.min {
            return false;
        }
        self.value -= 1;
        log::info!("Slowed down, speed: {}", self.value);
        true
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factor_reference_values() {
        assert_eq!(scale_factor(0), 1.0);
        assert!((scale_factor(1) - 1.5).abs() < 1e-6);
        assert!((scale_factor(3) - 3.375).abs() < 1e-6);
        assert!((scale_factor(-1) - 0.5).abs() < 1e-6);
        assert!((scale_factor(-3) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_dial_clamps_at_bounds() {
        let mut ts = Timescale::default();
        for _ in 0..10 {
            ts.increase();
        }
        assert_eq!(ts.value(), 3);
        assert!(!ts.increase());
        for _ in 0..10 {
            ts.decrease();
        }
        assert_eq!(ts.value(), -3);
        assert!(!ts.decrease());
        ts.reset();
        assert_eq!(ts.value(), 0);
    }
}
