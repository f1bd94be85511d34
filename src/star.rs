// Background stars: drift right, wrap to the left edge, twinkle.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::draw::fill_disc;
use crate::types::{FrameBuffer, gray};
use crate::vector::{map_range, random_below};

/// Phase advance per frame of the brightness sine.
pub const TWINKLE_RATE: f32 = 0.05;
pub const MIN_BRIGHTNESS: f32 = 100.0;
pub const MAX_BRIGHTNESS: f32 = 255.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32, // horizontal drift, px/frame
    pub size: f32,  // disc diameter, px
    pub phase: f32, // twinkle offset in [0, 2π)
}

impl Star {
    pub fn new(pos: Vec2, speed: f32, size: f32, phase: f32) -> Self {
        Self { pos, speed, size, phase }
    }

    /// Random star somewhere inside `viewport`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Vec2) -> Self {
        let pos = Vec2::new(random_below(rng, viewport.x), random_below(rng, viewport.y));
        let speed = rng.random_range(0.1..0.5);
        let size = rng.random_range(1.0..3.0);
        Self::new(pos, speed, size, rng.random_range(0.0..TAU))
    }

    /// Drift one frame. Past the right edge the star re-enters at x=0 on a new row.
    pub fn update<R: Rng + ?Sized>(&mut self, viewport: Vec2, rng: &mut R) {
        self.pos.x += self.speed;
        if self.pos.x > viewport.x {
            self.pos.x = 0.0;
            self.pos.y = random_below(rng, viewport.y);
        }
    }

    /// Gray level for this frame, in [100, 255].
    pub fn brightness(&self, frame: u64) -> u8 {
        let wave = (frame as f32 * TWINKLE_RATE + self.phase).sin();
        map_range(wave, -1.0, 1.0, MIN_BRIGHTNESS, MAX_BRIGHTNESS)
            .round()
            .clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS) as u8
    }

    pub fn render(&self, fb: &mut FrameBuffer, frame: u64) {
        fill_disc(fb, self.pos, self.size, gray(self.brightness(frame)));
    }
}
