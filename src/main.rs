// What you SEE:
// • A field of white dots flies in from random spots and settles into the text.
// • Move the mouse through the text: dots near the cursor scatter, then drift back.
// • Gray stars drift left-to-right behind the text and twinkle.
// • Resize the window: the text is re-sampled for the new size. ESC quits.

mod config;
mod draw;
mod error;
mod font5x7;
mod glyph;
mod particle;
mod scene;
mod star;
mod types;
mod vector;

use clap::Parser;
use config::Config;
use draw::{Drawer, draw_text_5x7};
use error::Error;
use log::{debug, info};
use scene::Scene;
use std::time::{Duration, Instant};
use types::{FrameBuffer, WHITE};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cfg = Config::parse();

    /* --- Initialization ---
       The font is loaded (or fails) before any window appears. */
    let sampler = cfg.sampler()?;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    info!(
        "starting: {}x{}, {} at {}px, stride {}, seed {}",
        cfg.width,
        cfg.height,
        sampler.typeface().describe(),
        cfg.font_size,
        cfg.stride,
        seed
    );
    let mut scene = Scene::new(sampler, cfg.scene_config(), cfg.width, cfg.height, seed);

    let mut drawer = Drawer::new("Glyph Swarm", cfg.width as usize, cfg.height as usize, cfg.fps)?;
    let mut screen = FrameBuffer::new(cfg.width as usize, cfg.height as usize);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Resize happens whole, before this frame is updated or drawn. */
        let (w, h) = drawer.size();
        if (w as u32, h as u32) != scene.size() && scene.resize(w as u32, h as u32) {
            screen.resize(w, h);
        }

        /* 2) Step and draw: stars first, particles on top. */
        scene.tick(drawer.mouse_pos());
        scene.render(&mut screen);

        if cfg.hud {
            let hud = format!(
                "{} | PARTICLES: {} | STARS: {}",
                hud_fps_text,
                scene.particles().len(),
                scene.stars().len()
            );
            draw_text_5x7(&mut screen, 8, 8, &hud, WHITE);
        }

        /* 3) Present to the window. */
        drawer.present(&screen)?;

        /* 4) FPS counter, once per second */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("window closed after {} frames", scene.frame());
    Ok(())
}
