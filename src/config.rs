// Command line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::glyph::{DEFAULT_FONT_SIZE, DEFAULT_STRIDE, DEFAULT_THRESHOLD, GlyphSampler, MAX_FONT_SIZE, Typeface};
use crate::scene::{DEFAULT_STAR_COUNT, SceneConfig};

#[derive(Parser, Debug, Clone)]
#[command(about = "Particles that assemble into text and scatter from the mouse", version)]
pub struct Config {
    /// Text the particles assemble into at startup.
    #[arg(long, default_value = "URIELx")]
    pub text: String,
    /// Text re-sampled after every window resize. Defaults to --text.
    #[arg(long)]
    pub resize_text: Option<String>,
    /// TrueType / OpenType font file. Without it the built-in block font is used.
    #[arg(long)]
    pub font: Option<PathBuf>,
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE, value_parser = parse_font_size)]
    pub font_size: f32,
    /// Sampling grid step in pixels; larger means fewer particles.
    #[arg(long, default_value_t = DEFAULT_STRIDE, value_parser = clap::value_parser!(u32).range(1..))]
    pub stride: u32,
    /// Red channel value a grid point must exceed to become a particle.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,
    #[arg(long, default_value_t = DEFAULT_STAR_COUNT)]
    pub stars: usize,
    /// RNG seed; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Spawn particles with a random unit velocity instead of at rest.
    #[arg(long)]
    pub scatter: bool,
    #[arg(long, default_value_t = 60)]
    pub fps: usize,
    /// Draw particle/star counts and FPS in the corner.
    #[arg(long)]
    pub hud: bool,
}

fn parse_font_size(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if v.is_finite() && v > 0.0 && v <= MAX_FONT_SIZE {
        Ok(v)
    } else {
        Err(format!("font size must be in (0, {MAX_FONT_SIZE}], got {s}"))
    }
}

impl Config {
    pub fn resize_text(&self) -> &str {
        self.resize_text.as_deref().unwrap_or(&self.text)
    }

    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            resize_text: self.resize_text().to_string(),
            star_count: self.stars,
            scatter: self.scatter,
            ..SceneConfig::new(self.text.clone())
        }
    }

    /// Load the typeface and build the sampler. Any font problem is fatal here.
    pub fn sampler(&self) -> Result<GlyphSampler, Error> {
        let typeface = match &self.font {
            Some(path) => Typeface::load(path)?,
            None => Typeface::Bitmap,
        };
        Ok(GlyphSampler::new(typeface)
            .with_font_size(self.font_size)
            .with_stride(self.stride)
            .with_threshold(self.threshold))
    }
}
