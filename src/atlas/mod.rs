//! Procedural tile-texture atlases.
//!
//! An atlas is one horizontal strip holding every frame of a tile's
//! animation. Rendering happens in memory; `TileAtlas::save` persists the
//! strip to `<dir>/<tile_id>_atlas.png`.

pub mod painter;

pub use painter::{FlatFill, FramePainter, PainterRegistry, WaterWave, WispyGrass};

use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};

use crate::core::error::Error;
use crate::core::seed::seeded_rng;
use crate::core::Result;

/// A rendered animation strip.
#[derive(Clone, Debug)]
pub struct TileAtlas {
    pub tile_id: String,
    pub image: RgbaImage,
    /// Logical per-frame names, in playback order.
    pub frames: Vec<String>,
}

impl TileAtlas {
    pub fn file_name(&self) -> String {
        atlas_file_name(&self.tile_id)
    }

    /// Write the strip as PNG into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        self.image.save(&path)?;
        log::debug!("Wrote atlas {} ({}x{})", path.display(), self.image.width(), self.image.height());
        Ok(path)
    }
}

pub fn atlas_file_name(tile_id: &str) -> String {
    format!("{}_atlas.png", tile_id)
}

pub fn frame_name(tile_id: &str, frame: u32) -> String {
    format!("{}_frame{}.png", tile_id, frame)
}

/// Renders animation atlases for tiles.
///
/// Each tile draws from its own RNG derived from the synthesizer seed and
/// the tile id, so a strip is reproducible regardless of render order.
pub struct TileAtlasSynthesizer {
    painters: PainterRegistry,
    seed: u64,
    output_dir: PathBuf,
}

impl TileAtlasSynthesizer {
    pub fn new(painters: PainterRegistry, seed: u64, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            painters,
            seed,
            output_dir: output_dir.into(),
        }
    }

    pub fn atlas_path(&self, tile_id: &str) -> PathBuf {
        self.output_dir.join(atlas_file_name(tile_id))
    }

    /// Render `frame_count` frames of `frame_size` pixels side by side.
    ///
    /// Fails with `AtlasTooLarge` when the strip width does not fit a `u32`.
    pub fn render(&self, tile_id: &str, frame_count: u32, frame_size: u32) -> Result<TileAtlas> {
        let width = frame_count.checked_mul(frame_size).ok_or_else(|| Error::AtlasTooLarge {
            tile_id: tile_id.to_string(),
            frame_count,
            frame_size,
        })?;
        let painter = self.painters.get(tile_id);
        let mut rng = seeded_rng(self.seed, &format!("atlas:{}", tile_id));
        let mut image = RgbaImage::new(width, frame_size);

        for frame in 0..frame_count {
            let tile = painter.paint(frame, frame_size, &mut rng);
            imageops::replace(&mut image, &tile, i64::from(frame * frame_size), 0);
        }

        Ok(TileAtlas {
            tile_id: tile_id.to_string(),
            image,
            frames: (0..frame_count).map(|f| frame_name(tile_id, f)).collect(),
        })
    }

    /// Render and persist an atlas, returning its frame names.
    pub fn synthesize(&self, tile_id: &str, frame_count: u32, frame_size: u32) -> Result<Vec<String>> {
        let atlas = self.render(tile_id, frame_count, frame_size)?;
        atlas.save(&self.output_dir)?;
        Ok(atlas.frames)
    }
}
