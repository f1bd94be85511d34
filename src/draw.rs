// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the canvas.
// 2) Filled discs (stars, particles).
// 3) HUD text with the 5x7 block font.

use crate::error::Error;
use crate::font5x7::{ADVANCE, glyph5x7, lit_cells};
use crate::types::{BLACK, FrameBuffer};
use glam::Vec2;
use minifb::{Key, MouseMode, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window capped at `fps` frames per second.
    /// Canvas pixels map 1:1 to window pixels (no stretching on resize).
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::UpperLeft,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current inner size of the window in pixels.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in window pixels; None while the cursor is outside the window.
    pub fn mouse_pos(&self) -> Option<Vec2> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Vec2::new(x, y))
    }
}

/* ---------- Software drawing: pixels, discs, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Filled circle of `diameter` pixels centered at `center`, no outline.
/// Below 2 px it lights exactly the pixel under `center`.
pub fn fill_disc(fb: &mut FrameBuffer, center: Vec2, diameter: f32, color: u32) {
    let r = diameter * 0.5;
    if r < 1.0 {
        put_pixel(fb, center.x.floor() as i32, center.y.floor() as i32, color);
        return;
    }

    let r2 = r * r;
    let (x0, x1) = ((center.x - r).floor() as i32, (center.x + r).ceil() as i32);
    let (y0, y1) = ((center.y - r).floor() as i32, (center.y + r).ceil() as i32);

    // Scan just the bounding box; a pixel is in if its center is inside the circle
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, x, y, color);
            }
        }
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (rx, ry) in lit_cells(rows) {
            put_pixel(fb, x + rx as i32 + 1, y + ry as i32 + 1, BLACK);
        }
        for (rx, ry) in lit_cells(rows) {
            put_pixel(fb, x + rx as i32, y + ry as i32, color);
        }
    }
}

/// Draw a text string using 5x7 glyphs (HUD).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += ADVANCE as i32;
    }
}
