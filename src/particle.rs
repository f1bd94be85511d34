// A steerable dot that seeks its slot in the text and runs from the mouse.

use glam::Vec2;

use crate::draw::fill_disc;
use crate::types::{FrameBuffer, WHITE};
use crate::vector::{Steer, map_range};

pub const MAX_SPEED: f32 = 10.0;
pub const MAX_FORCE: f32 = 1.0;
/// Inside this distance the arrive speed ramps down linearly to 0.
pub const ARRIVE_RADIUS: f32 = 100.0;
/// The pointer only repels particles closer than this.
pub const FLEE_RADIUS: f32 = 50.0;
pub const ARRIVE_WEIGHT: f32 = 1.0;
pub const FLEE_WEIGHT: f32 = 5.0;
pub const PARTICLE_DIAMETER: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    target: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Particle {
    pub fn new(target: Vec2, pos: Vec2, vel: Vec2) -> Self {
        Self {
            target,
            pos,
            vel,
            acc: Vec2::ZERO,
            max_speed: MAX_SPEED,
            max_force: MAX_FORCE,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Desired speed at `distance` from the target.
    pub fn arrive_speed(&self, distance: f32) -> f32 {
        if distance < ARRIVE_RADIUS {
            map_range(distance, 0.0, ARRIVE_RADIUS, 0.0, self.max_speed)
        } else {
            self.max_speed
        }
    }

    /// Steering toward `target`, slowing down inside [`ARRIVE_RADIUS`].
    pub fn arrive(&self, target: Vec2) -> Vec2 {
        let desired = target - self.pos;
        let speed = self.arrive_speed(desired.length());
        (desired.set_magnitude(speed) - self.vel).limit(self.max_force)
    }

    /// Steering away from `threat` at full speed; zero at or beyond [`FLEE_RADIUS`].
    pub fn flee(&self, threat: Vec2) -> Vec2 {
        let toward = threat - self.pos;
        if toward.length() >= FLEE_RADIUS {
            return Vec2::ZERO;
        }
        let desired = -toward.set_magnitude(self.max_speed);
        (desired - self.vel).limit(self.max_force)
    }

    /// Net weighted force for this frame. No pointer, no flee.
    pub fn steering(&self, pointer: Option<Vec2>) -> Vec2 {
        let arrive = self.arrive(self.target) * ARRIVE_WEIGHT;
        let flee = pointer.map_or(Vec2::ZERO, |p| self.flee(p)) * FLEE_WEIGHT;
        arrive + flee
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// Semi-implicit Euler step; acceleration never carries into the next frame.
    pub fn integrate(&mut self) {
        self.vel += self.acc;
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
    }

    /// One frame: steer, then integrate.
    pub fn update(&mut self, pointer: Option<Vec2>) {
        let force = self.steering(pointer);
        self.apply_force(force);
        self.integrate();
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        fill_disc(fb, self.pos, PARTICLE_DIAMETER, WHITE);
    }
}
