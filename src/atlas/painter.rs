//! Per-tile frame painters.
//!
//! A painter renders one square frame of an animated tile. Painters are
//! looked up by tile id through `PainterRegistry`; ids without a painter get
//! a flat placeholder fill.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Placeholder color for tiles without a dedicated painter.
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([139, 69, 19, 255]);

/// Renders single frames of a tile animation.
pub trait FramePainter: Send + Sync {
    /// Paint frame `frame` as a `size` x `size` image.
    fn paint(&self, frame: u32, size: u32, rng: &mut ChaCha8Rng) -> RgbaImage;
}

/// Translucent water with a horizontal sine highlight whose phase advances
/// by `phase_step` radians per frame.
#[derive(Clone, Copy, Debug)]
pub struct WaterWave {
    pub background: Rgba<u8>,
    pub highlight: Rgba<u8>,
    pub phase_step: f64,
}

impl Default for WaterWave {
    fn default() -> Self {
        Self {
            background: Rgba([64, 164, 223, 128]),
            highlight: Rgba([255, 255, 255, 100]),
            phase_step: 0.5,
        }
    }
}

impl FramePainter for WaterWave {
    fn paint(&self, frame: u32, size: u32, _rng: &mut ChaCha8Rng) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(size, size, self.background);
        // Geometry is authored for 64px frames and scaled from there.
        let unit = size as f64 / 64.0;
        let mid = size as f64 / 2.0;
        let amplitude = 10.0 * unit;
        let half_band = (5.0 * unit).round() as i64;

        for x in 0..size {
            let phase = (x as f64 / unit) * 0.1 + frame as f64 * self.phase_step;
            let y_wave = (mid + amplitude * phase.sin()) as i64;
            let x = i64::from(x);
            draw_line(&mut img, (x, y_wave - half_band), (x, y_wave + half_band), self.highlight, 2);
        }
        img
    }
}

/// Opaque grass with randomly placed short blades, re-rolled every frame.
///
/// Frames are not continuous with each other; the flicker is the effect.
#[derive(Clone, Copy, Debug)]
pub struct WispyGrass {
    pub background: Rgba<u8>,
    pub blade: Rgba<u8>,
    /// Half-open range for the number of blades per frame.
    pub blades: (u32, u32),
    /// Half-open range for blade length at 64px.
    pub length: (u32, u32),
}

impl Default for WispyGrass {
    fn default() -> Self {
        Self {
            background: Rgba([34, 139, 34, 255]),
            blade: Rgba([0, 100, 0, 255]),
            blades: (5, 15),
            length: (10, 20),
        }
    }
}

impl FramePainter for WispyGrass {
    fn paint(&self, _frame: u32, size: u32, rng: &mut ChaCha8Rng) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(size, size, self.background);
        if size == 0 {
            return img;
        }
        let unit = size as f64 / 64.0;
        let base = i64::from(size);

        let count = rng.random_range(self.blades.0..self.blades.1);
        for _ in 0..count {
            let bx = i64::from(rng.random_range(0..size));
            let length = (f64::from(rng.random_range(self.length.0..self.length.1)) * unit) as i64;
            let lean = rng.random_range(-2..2);
            draw_line(&mut img, (bx, base), (bx + lean, base - length), self.blade, 1);
        }
        img
    }
}

/// Single flat color, identical for every frame.
#[derive(Clone, Copy, Debug)]
pub struct FlatFill(pub Rgba<u8>);

impl Default for FlatFill {
    fn default() -> Self {
        Self(PLACEHOLDER_COLOR)
    }
}

impl FramePainter for FlatFill {
    fn paint(&self, _frame: u32, size: u32, _rng: &mut ChaCha8Rng) -> RgbaImage {
        RgbaImage::from_pixel(size, size, self.0)
    }
}

/// Maps tile ids to painters.
pub struct PainterRegistry {
    painters: HashMap<String, Box<dyn FramePainter>>,
    fallback: FlatFill,
}

impl Default for PainterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("water_wave", WaterWave::default());
        registry.register("grass_wispy", WispyGrass::default());
        registry
    }
}

impl PainterRegistry {
    pub fn empty() -> Self {
        Self {
            painters: HashMap::new(),
            fallback: FlatFill::default(),
        }
    }

    pub fn register(&mut self, tile_id: impl Into<String>, painter: impl FramePainter + 'static) {
        self.painters.insert(tile_id.into(), Box::new(painter));
    }

    pub fn contains(&self, tile_id: &str) -> bool {
        self.painters.contains_key(tile_id)
    }

    /// Painter for a tile id, or the flat placeholder.
    pub fn get(&self, tile_id: &str) -> &dyn FramePainter {
        match self.painters.get(tile_id) {
            Some(painter) => painter.as_ref(),
            None => &self.fallback,
        }
    }
}

/// Bresenham line, clipped to the image. A `width` of 2 also paints the
/// pixel column (or row) next to each step.
fn draw_line(img: &mut RgbaImage, from: (i64, i64), to: (i64, i64), color: Rgba<u8>, width: u32) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mostly_vertical = dx < -dy;
    let mut err = dx + dy;

    loop {
        plot(img, x, y, color);
        for offset in 1..i64::from(width) {
            if mostly_vertical {
                plot(img, x + offset, y, color);
            } else {
                plot(img, x, y + offset, color);
            }
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn plot(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn test_water_has_highlight_band() {
        let painter = WaterWave::default();
        let img = painter.paint(0, 64, &mut rng());
        assert_eq!(img.dimensions(), (64, 64));
        // Column 0 at frame 0: sin(0) = 0, band centered on row 32
        assert_eq!(*img.get_pixel(0, 32), painter.highlight);
        assert_eq!(*img.get_pixel(0, 0), painter.background);
    }

    #[test]
    fn test_water_phase_moves() {
        let painter = WaterWave::default();
        let a = painter.paint(0, 64, &mut rng());
        let b = painter.paint(1, 64, &mut rng());
        assert_ne!(a, b);
    }

    #[test]
    fn test_grass_draws_blades() {
        let painter = WispyGrass::default();
        let img = painter.paint(0, 64, &mut rng());
        let blade_pixels = img.pixels().filter(|p| **p == painter.blade).count();
        assert!(blade_pixels > 0);
        assert!(img.pixels().all(|p| *p == painter.blade || *p == painter.background));
    }

    #[test]
    fn test_flat_fill() {
        let img = FlatFill::default().paint(3, 8, &mut rng());
        assert!(img.pixels().all(|p| *p == PLACEHOLDER_COLOR));
    }

    #[test]
    fn test_registry_fallback() {
        let registry = PainterRegistry::default();
        assert!(registry.contains("water_wave"));
        assert!(!registry.contains("lava_pool"));
        let img = registry.get("lava_pool").paint(0, 4, &mut rng());
        assert_eq!(*img.get_pixel(2, 2), PLACEHOLDER_COLOR);
    }

    #[test]
    fn test_draw_line_clips() {
        let mut img = RgbaImage::new(4, 4);
        let red = Rgba([255, 0, 0, 255]);
        draw_line(&mut img, (-3, 1), (10, 1), red, 1);
        for x in 0..4 {
            assert_eq!(*img.get_pixel(x, 1), red);
        }
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }
}
