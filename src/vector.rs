// Vector helpers used by the steering code.
//
// `glam::Vec2` already covers add/sub/scale/length; this adds the handful of
// operations steering needs on top of it.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

pub trait Steer: Sized {
    /// Same direction, length `m`. A zero (or non-finite) vector stays zero.
    fn set_magnitude(self, m: f32) -> Self;
    /// Unchanged when `|v| <= max`, otherwise rescaled to length `max`.
    fn limit(self, max: f32) -> Self;
    /// Length 1 at a uniformly random angle in [0, 2π).
    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl Steer for Vec2 {
    #[inline]
    fn set_magnitude(self, m: f32) -> Vec2 {
        self.normalize_or_zero() * m
    }

    #[inline]
    fn limit(self, max: f32) -> Vec2 {
        if self.length_squared() > max * max {
            self.normalize_or_zero() * max
        } else {
            self
        }
    }

    fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
        Vec2::from_angle(rng.random_range(0.0..TAU))
    }
}

/// Linear re-map of `value` from `[in_lo, in_hi]` to `[out_lo, out_hi]` (unclamped).
#[inline]
pub fn map_range(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    out_lo + (value - in_lo) * (out_hi - out_lo) / (in_hi - in_lo)
}

/// Uniform value in `[0, max)`; 0 when the range is empty.
#[inline]
pub fn random_below<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 { rng.random_range(0.0..max) } else { 0.0 }
}
