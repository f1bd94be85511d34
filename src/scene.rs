// Owns the stars and particles and drives them frame by frame.
//
// Lifecycle: [`Scene::new`] is the one-shot initialization (star field, first
// sample pass, first particle set); after that the host calls [`Scene::tick`]
// and [`Scene::render`] once per frame, and [`Scene::resize`] whenever the
// viewport changes. A resize swaps in a complete new particle set, so a frame
// never sees a half-built collection.

use glam::Vec2;
use log::{info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::glyph::GlyphSampler;
use crate::particle::Particle;
use crate::star::Star;
use crate::types::{BLACK, FrameBuffer};
use crate::vector::{Steer, random_below};

pub const DEFAULT_STAR_COUNT: usize = 150;

#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Text shown at startup.
    pub text: String,
    /// Text re-sampled after a resize.
    pub resize_text: String,
    pub star_count: usize,
    /// Spawn particles with a random unit velocity instead of at rest.
    pub scatter: bool,
}

impl SceneConfig {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            resize_text: text.clone(),
            text,
            star_count: DEFAULT_STAR_COUNT,
            scatter: false,
        }
    }
}

pub struct Scene {
    config: SceneConfig,
    sampler: GlyphSampler,
    width: u32,
    height: u32,
    stars: Vec<Star>,
    particles: Vec<Particle>,
    frame: u64,
    rng: Pcg32,
}

impl Scene {
    pub fn new(sampler: GlyphSampler, config: SceneConfig, width: u32, height: u32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let viewport = Vec2::new(width as f32, height as f32);

        let stars: Vec<Star> = (0..config.star_count)
            .map(|_| Star::random(&mut rng, viewport))
            .collect();
        let particles = spawn_particles(&sampler, &config.text, width, height, config.scatter, &mut rng);

        info!(
            "scene ready: {}x{}, text {:?}, {} particles, {} stars",
            width,
            height,
            config.text,
            particles.len(),
            stars.len()
        );

        Self { config, sampler, width, height, stars, particles, frame: 0, rng }
    }

    /// Advance one frame: stars drift and twinkle, then particles steer and move.
    pub fn tick(&mut self, pointer: Option<Vec2>) {
        self.frame += 1;
        let viewport = self.viewport();
        for star in self.stars.iter_mut() {
            star.update(viewport, &mut self.rng);
        }
        for particle in self.particles.iter_mut() {
            particle.update(pointer);
        }
    }

    /// Clear to black, then stars, then particles on top.
    pub fn render(&self, fb: &mut FrameBuffer) {
        fb.clear(BLACK);
        for star in &self.stars {
            star.render(fb, self.frame);
        }
        for particle in &self.particles {
            particle.render(fb);
        }
    }

    /// Re-sample the text for the new viewport and replace every particle.
    /// Stars are kept as they are. Returns false (and changes nothing) for a
    /// size with a zero dimension.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let fresh = spawn_particles(
            &self.sampler,
            &self.config.resize_text,
            width,
            height,
            self.config.scatter,
            &mut self.rng,
        );
        self.width = width;
        self.height = height;
        self.particles = fresh;
        info!("resized to {}x{}: {} particles", width, height, self.particles.len());
        true
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// One particle per sampled point, each starting somewhere random in the viewport.
fn spawn_particles(
    sampler: &GlyphSampler,
    text: &str,
    width: u32,
    height: u32,
    scatter: bool,
    rng: &mut Pcg32,
) -> Vec<Particle> {
    let samples = sampler.sample(text, width, height);
    if samples.is_empty() {
        warn!("text {:?} produced no particles at {}x{}", text, width, height);
    }
    samples
        .into_iter()
        .map(|(x, y)| {
            let pos = Vec2::new(random_below(rng, width as f32), random_below(rng, height as f32));
            let vel = if scatter { Vec2::random_unit(rng) } else { Vec2::ZERO };
            Particle::new(Vec2::new(x as f32, y as f32), pos, vel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Typeface;
    use std::collections::HashSet;

    fn scene(text: &str, resize_text: &str, width: u32, height: u32, seed: u64) -> Scene {
        let mut config = SceneConfig::new(text);
        config.resize_text = resize_text.to_string();
        Scene::new(GlyphSampler::new(Typeface::Bitmap), config, width, height, seed)
    }

    fn targets(scene: &Scene) -> HashSet<(i64, i64)> {
        scene
            .particles()
            .iter()
            .map(|p| (p.target().x as i64, p.target().y as i64))
            .collect()
    }

    #[test]
    fn test_init_builds_one_particle_per_sample() {
        let s = scene("AB", "AB", 800, 600, 1);
        let samples = GlyphSampler::new(Typeface::Bitmap).sample("AB", 800, 600);
        assert_eq!(s.particles().len(), samples.len());
        assert_eq!(s.stars().len(), DEFAULT_STAR_COUNT);
        for (p, &(x, y)) in s.particles().iter().zip(&samples) {
            assert_eq!(p.target(), Vec2::new(x as f32, y as f32));
            assert_eq!(p.vel, Vec2::ZERO);
            assert!(p.pos.x >= 0.0 && p.pos.x < 800.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 600.0);
        }
    }

    #[test]
    fn test_resize_rebuilds_every_particle() {
        let mut s = scene("AB", "CD", 800, 600, 2);
        let before = targets(&s);
        let stars_before = s.stars().to_vec();

        assert!(s.resize(400, 300));
        let expected = GlyphSampler::new(Typeface::Bitmap).sample("CD", 400, 300);
        assert_eq!(s.size(), (400, 300));
        assert_eq!(s.particles().len(), expected.len());

        let after = targets(&s);
        assert!(before.is_disjoint(&after));
        // stars survive a resize untouched
        assert_eq!(s.stars(), &stars_before[..]);
        for p in s.particles() {
            assert!(p.pos.x < 400.0 && p.pos.y < 300.0);
        }
    }

    #[test]
    fn test_last_resize_wins() {
        let mut s = scene("AB", "AB", 800, 600, 3);
        s.resize(300, 200);
        s.resize(640, 480);
        let expected = GlyphSampler::new(Typeface::Bitmap).sample("AB", 640, 480);
        assert_eq!(s.size(), (640, 480));
        assert_eq!(s.particles().len(), expected.len());
    }

    #[test]
    fn test_zero_size_resize_is_ignored() {
        let mut s = scene("AB", "CD", 800, 600, 4);
        let before = s.particles().to_vec();
        assert!(!s.resize(0, 600));
        assert!(!s.resize(800, 0));
        assert_eq!(s.size(), (800, 600));
        assert_eq!(s.particles(), &before[..]);
    }

    #[test]
    fn test_tick_moves_particles_toward_targets() {
        let mut s = scene("HI", "HI", 400, 300, 5);
        let mean_distance = |s: &Scene| {
            let total: f32 = s.particles().iter().map(|p| p.pos.distance(p.target())).sum();
            total / s.particles().len() as f32
        };
        let start = mean_distance(&s);
        for _ in 0..300 {
            s.tick(None);
        }
        assert_eq!(s.frame(), 300);
        assert!(mean_distance(&s) < start * 0.1);
    }

    #[test]
    fn test_pointer_scatters_nearby_particles() {
        let mut s = scene("HI", "HI", 400, 300, 6);
        for _ in 0..400 {
            s.tick(None);
        }
        let settled = s.particles()[0].clone();
        let pointer = settled.target() + Vec2::new(5.0, 0.0);
        for _ in 0..5 {
            s.tick(Some(pointer));
        }
        let moved = &s.particles()[0];
        assert!(moved.pos.distance(pointer) > settled.pos.distance(pointer));
    }

    #[test]
    fn test_same_seed_same_animation() {
        let mut a = scene("OK", "OK", 320, 240, 42);
        let mut b = scene("OK", "OK", 320, 240, 42);
        for i in 0..50 {
            let pointer = (i % 2 == 0).then(|| Vec2::new(160.0, 120.0));
            a.tick(pointer);
            b.tick(pointer);
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.stars(), b.stars());
    }

    #[test]
    fn test_scatter_spawns_moving_particles() {
        let mut config = SceneConfig::new("AB");
        config.scatter = true;
        let s = Scene::new(GlyphSampler::new(Typeface::Bitmap), config, 800, 600, 8);
        assert!(s.particles().iter().all(|p| (p.vel.length() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_render_clears_and_draws() {
        let s = scene("AB", "AB", 200, 100, 9);
        let mut fb = FrameBuffer::new(200, 100);
        fb.clear(0x00_FF_00_00);
        s.render(&mut fb);
        assert!(fb.pixels.iter().all(|&p| p != 0x00_FF_00_00));
        assert!(fb.pixels.iter().any(|&p| p != BLACK));
    }

    #[test]
    fn test_stars_stay_in_view_across_frames() {
        let mut s = scene("AB", "AB", 200, 100, 10);
        for _ in 0..2000 {
            s.tick(None);
        }
        for star in s.stars() {
            assert!(star.pos.x >= 0.0 && star.pos.x <= 200.0 + star.speed);
            assert!(star.pos.y >= 0.0 && star.pos.y < 100.0);
        }
    }
}
