// Core types shared by the scene and the window.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the canvas is on screen (pixels)
    pub height: usize,     // how tall the canvas is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Black canvas of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate for a new window size. Old contents are dropped.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Pixel at (x,y), or None when outside the canvas.
    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

/// One lit grid point of the rasterized text, in buffer pixels.
pub type GlyphSample = (u32, u32);

/// Pack a gray level into 0x00RRGGBB.
#[inline]
pub fn gray(level: u8) -> u32 {
    let v = level as u32;
    (v << 16) | (v << 8) | v
}

pub const BLACK: u32 = 0x00_00_00_00;
pub const WHITE: u32 = 0x00_FF_FF_FF;
