// Text → particle targets.
//
// The text is drawn white-on-black into an off-screen buffer the size of the
// viewport, then the buffer is read back on a coarse grid. Every grid point
// whose red channel is above the threshold becomes one target.

use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::error::Error;
use crate::font5x7::{ADVANCE, GLYPH_H, glyph5x7, lit_cells};
use crate::types::GlyphSample;

pub const DEFAULT_FONT_SIZE: f32 = 162.0;
pub const DEFAULT_STRIDE: u32 = 5;
pub const DEFAULT_THRESHOLD: u8 = 128;
/// Largest accepted font size, px.
pub const MAX_FONT_SIZE: f32 = 4096.0;

/// Where glyph shapes come from.
pub enum Typeface {
    /// Built-in 5x7 block letters, one cell = `font_size / 10` pixels.
    Bitmap,
    /// A TrueType/OpenType font file.
    Outline(FontVec),
}

impl Typeface {
    /// Read and parse a font file. Fails instead of falling back, so a typo in
    /// the path never shows up as an empty screen.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(bytes, path)
    }

    /// Parse font bytes; `origin` is only used for the error message.
    pub fn from_bytes(bytes: Vec<u8>, origin: &Path) -> Result<Self, Error> {
        FontVec::try_from_vec(bytes)
            .map(Typeface::Outline)
            .map_err(|e| Error::FontDecode {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Typeface::Bitmap => "built-in 5x7",
            Typeface::Outline(_) => "outline font",
        }
    }
}

pub struct GlyphSampler {
    typeface: Typeface,
    pub font_size: f32,
    pub stride: u32,
    pub threshold: u8,
}

impl GlyphSampler {
    pub fn new(typeface: Typeface) -> Self {
        Self {
            typeface,
            font_size: DEFAULT_FONT_SIZE,
            stride: DEFAULT_STRIDE,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    /// Draw `text` centered in a fresh black `width` x `height` buffer.
    pub fn rasterize(&self, text: &str, width: u32, height: u32) -> RgbaImage {
        let mut buf = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        match &self.typeface {
            Typeface::Bitmap => draw_bitmap(&mut buf, text, self.font_size),
            Typeface::Outline(font) => draw_outline(&mut buf, font, text, self.font_size),
        }
        buf
    }

    /// Lit grid points of the rasterized text, in scan order
    /// (columns left to right, each column top to bottom).
    pub fn sample(&self, text: &str, width: u32, height: u32) -> Vec<GlyphSample> {
        let buf = self.rasterize(text, width, height);
        scan(&buf, self.stride, self.threshold)
    }
}

fn scan(buf: &RgbaImage, stride: u32, threshold: u8) -> Vec<GlyphSample> {
    let step = stride.max(1) as usize;
    let mut out = Vec::new();
    for x in (0..buf.width()).step_by(step) {
        for y in (0..buf.height()).step_by(step) {
            if buf.get_pixel(x, y)[0] > threshold {
                out.push((x, y));
            }
        }
    }
    out
}

/// Raise (x,y) to at least `level` white. Out-of-bounds writes are dropped.
#[inline]
fn lighten(buf: &mut RgbaImage, x: i64, y: i64, level: u8) {
    if x < 0 || y < 0 || x >= buf.width() as i64 || y >= buf.height() as i64 {
        return;
    }
    let px = buf.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        px[c] = px[c].max(level);
    }
}

fn draw_bitmap(buf: &mut RgbaImage, text: &str, font_size: f32) {
    let cell = (font_size.min(MAX_FONT_SIZE) / 10.0).round().max(1.0) as i64;
    let glyphs: Vec<Option<[u8; 7]>> = text.chars().map(glyph5x7).collect();
    if glyphs.is_empty() {
        return;
    }

    // No trailing gap after the last character
    let cols = glyphs.len() as i64 * ADVANCE as i64 - 1;
    let text_w = cols * cell;
    let text_h = GLYPH_H as i64 * cell;
    let left = (buf.width() as i64 - text_w) / 2;
    let top = (buf.height() as i64 - text_h) / 2;

    for (i, rows) in glyphs.into_iter().enumerate() {
        // Unknown characters keep their slot but draw nothing
        let Some(rows) = rows else { continue };
        let origin_x = left + i as i64 * ADVANCE as i64 * cell;
        for (rx, ry) in lit_cells(rows) {
            let bx = origin_x + rx as i64 * cell;
            let by = top + ry as i64 * cell;
            // Only the on-buffer part of the cell
            let xs = bx.max(0)..(bx + cell).min(buf.width() as i64);
            let ys = by.max(0)..(by + cell).min(buf.height() as i64);
            for y in ys {
                for x in xs.clone() {
                    lighten(buf, x, y, 255);
                }
            }
        }
    }
}

fn draw_outline(buf: &mut RgbaImage, font: &FontVec, text: &str, font_size: f32) {
    let scale = PxScale::from(font_size.min(MAX_FONT_SIZE));
    let scaled = font.as_scaled(scale);

    // Lay out along a baseline at y=0, then shift the whole run into place
    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars().filter(|c| !c.is_control()) {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }

    let left = buf.width() as f32 / 2.0 - caret / 2.0;
    // descent is negative: this puts the ascent..descent box on the center line
    let baseline = buf.height() as f32 / 2.0 + (scaled.ascent() + scaled.descent()) / 2.0;

    for mut glyph in glyphs {
        glyph.position = point(left + glyph.position.x, baseline);
        let Some(outlined) = font.outline_glyph(glyph) else { continue };
        let bounds = outlined.px_bounds();
        let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
        outlined.draw(|x, y, coverage| {
            let level = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            lighten(buf, ox + x as i64, oy + y as i64, level);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn bitmap_sampler() -> GlyphSampler {
        GlyphSampler::new(Typeface::Bitmap)
    }

    #[test]
    fn test_end_to_end_ab_800x600() {
        let sampler = bitmap_sampler();
        assert_eq!(sampler.font_size, 162.0);
        assert_eq!(sampler.stride, 5);
        assert_eq!(sampler.threshold, 128);

        let samples = sampler.sample("AB", 800, 600);
        assert!(!samples.is_empty());

        // cell = 16 px; "AB" = 11 cells wide, 7 tall, centered
        for &(x, y) in &samples {
            assert!(x < 800 && y < 600);
            assert!((312..488).contains(&x), "x={x} outside text box");
            assert!((244..356).contains(&y), "y={y} outside text box");
            assert_eq!(x % 5, 0);
            assert_eq!(y % 5, 0);
        }

        let again = sampler.sample("AB", 800, 600);
        assert_eq!(samples, again);
        assert_eq!(samples.len(), sampler.sample("AB", 800, 600).len());
    }

    #[test]
    fn test_scan_order_is_column_major() {
        let samples = bitmap_sampler().sample("HI", 400, 300);
        assert!(samples.len() > 2);
        for pair in samples.windows(2) {
            assert!(pair[0] < pair[1], "{:?} not before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut buf = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        buf.put_pixel(0, 0, Rgba([128, 255, 255, 255]));
        buf.put_pixel(5, 0, Rgba([129, 0, 0, 255]));
        // green/blue are ignored, only red counts
        buf.put_pixel(0, 5, Rgba([0, 255, 255, 255]));
        assert_eq!(scan(&buf, 5, 128), vec![(5, 0)]);
    }

    #[test]
    fn test_stride_picks_grid_points_only() {
        let mut buf = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        buf.put_pixel(3, 3, Rgba([255, 255, 255, 255]));
        assert!(scan(&buf, 5, 128).is_empty());
        assert_eq!(scan(&buf, 1, 128), vec![(3, 3)]);
        // stride 0 behaves as 1 instead of looping forever
        assert_eq!(scan(&buf, 0, 128), vec![(3, 3)]);
    }

    #[test]
    fn test_coarser_stride_is_subset() {
        let fine: HashSet<_> = bitmap_sampler().with_stride(1).sample("OK", 300, 200).into_iter().collect();
        let coarse = bitmap_sampler().with_stride(5).sample("OK", 300, 200);
        assert!(!coarse.is_empty());
        assert!(coarse.iter().all(|s| fine.contains(s)));
        assert!(fine.len() > coarse.len());
    }

    #[test]
    fn test_rasterize_centers_text() {
        let buf = bitmap_sampler().with_font_size(10.0).rasterize("I", 21, 21);
        // cell = 1; "I" is 5x7 at (8,7); its stem is column 2
        assert_eq!(buf.get_pixel(10, 10)[0], 255);
        assert_eq!(buf.get_pixel(0, 0)[0], 0);
        assert_eq!(buf.get_pixel(10, 6)[0], 0);
        assert_eq!(buf.get_pixel(10, 7)[0], 255);
    }

    #[test]
    fn test_empty_inputs() {
        let sampler = bitmap_sampler();
        assert!(sampler.sample("", 800, 600).is_empty());
        assert!(sampler.sample("   ", 800, 600).is_empty());
        assert!(sampler.sample("AB", 0, 0).is_empty());
    }

    #[test]
    fn test_text_wider_than_viewport_is_clipped() {
        let samples = bitmap_sampler().sample("WWWWWWWW", 100, 100);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|&(x, y)| x < 100 && y < 100));
    }

    const MONO_TTF: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");

    fn outline_sampler() -> GlyphSampler {
        let typeface = Typeface::from_bytes(MONO_TTF.to_vec(), Path::new("DejaVuSansMono.ttf"))
            .unwrap_or_else(|e| panic!("fixture font: {e}"));
        assert!(matches!(typeface, Typeface::Outline(_)));
        GlyphSampler::new(typeface)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of pixels brighter than 128.
    fn lit_bounds(buf: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in buf.enumerate_pixels() {
            if px[0] > 128 {
                let b = bounds.get_or_insert((x, y, x, y));
                b.0 = b.0.min(x);
                b.1 = b.1.min(y);
                b.2 = b.2.max(x);
                b.3 = b.3.max(y);
            }
        }
        bounds
    }

    #[test]
    fn test_outline_font_samples_deterministically() {
        let sampler = outline_sampler();
        let samples = sampler.sample("SWARM", 800, 600);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|&(x, y)| x < 800 && y < 600 && x % 5 == 0 && y % 5 == 0));
        assert_eq!(samples, sampler.sample("SWARM", 800, 600));
        assert_ne!(samples, sampler.sample("OTHER", 800, 600));
    }

    #[test]
    fn test_outline_font_is_centered() {
        let buf = outline_sampler().rasterize("HOH", 800, 600);
        let (x0, y0, x1, y1) = lit_bounds(&buf).expect("nothing drawn");
        let mid_x = (x0 + x1) as f32 / 2.0;
        let mid_y = (y0 + y1) as f32 / 2.0;
        assert!((mid_x - 400.0).abs() < 8.0, "horizontal center {mid_x}");
        assert!((mid_y - 300.0).abs() < 8.0, "vertical center {mid_y}");
        // glyphs land on-buffer at their own spot, not piled at the origin
        assert!(x0 > 200 && x1 < 600);
        assert_eq!(buf.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_outline_font_survives_huge_size() {
        let samples = outline_sampler().with_font_size(1e9).sample("A", 64, 64);
        assert!(samples.iter().all(|&(x, y)| x < 64 && y < 64));
    }

    #[test]
    fn test_huge_bitmap_cells_are_clipped() {
        // cell size is capped; only the on-buffer part of each cell is visited
        let samples = bitmap_sampler().with_font_size(1e20).sample("AB", 100, 100);
        assert!(samples.iter().all(|&(x, y)| x < 100 && y < 100));
    }

    #[test]
    fn test_missing_font_fails_fast() {
        let path = PathBuf::from("/definitely/not/here/font.ttf");
        match Typeface::load(&path) {
            Err(Error::FontLoad { path: p, .. }) => assert_eq!(p, path),
            Err(e) => panic!("wrong error: {e}"),
            Ok(_) => panic!("loaded a font that does not exist"),
        }
    }

    #[test]
    fn test_garbage_font_fails_to_decode() {
        let result = Typeface::from_bytes(b"not a font".to_vec(), Path::new("junk.ttf"));
        assert!(matches!(result, Err(Error::FontDecode { .. })));
    }
}
