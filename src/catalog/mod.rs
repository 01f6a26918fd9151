//! Tile catalog construction.
//!
//! Turns tile definition rows into `TileDefinition`s:
//! 1. Baseline fields from the row (`blocks_sight = !passable`, flammability 0)
//! 2. Per-id overrides from the `BehaviorRegistry` (animation, sway, flammability, sight)
//! 3. Height levels from the row's `TileKind` strategy
//!
//! Animated tiles get their atlas rendered in memory; the caller decides
//! when to persist it.

pub mod row;
pub mod definition;
pub mod behavior;

pub use row::TileRow;
pub use definition::{HeightLevel, HeightStack, TileDefinition, TileKind};
pub use behavior::{AnimationSpec, BehaviorRegistry, TileBehavior};

use crate::atlas::{TileAtlas, TileAtlasSynthesizer};
use crate::core::seed::seeded_rng;
use crate::core::Result;

/// Built catalog: definitions in source order plus the atlases they reference.
#[derive(Clone, Debug)]
pub struct TileCatalog {
    pub tiles: Vec<TileDefinition>,
    pub atlases: Vec<TileAtlas>,
}

impl TileCatalog {
    pub fn get(&self, tile_id: &str) -> Option<&TileDefinition> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }
}

/// Builds a `TileCatalog` from source rows.
pub struct TileCatalogBuilder<'a> {
    synthesizer: &'a TileAtlasSynthesizer,
    behaviors: &'a BehaviorRegistry,
    /// Chance that a terrain row becomes a three-level tree stack.
    tree_chance: f64,
    frame_size: u32,
    seed: u64,
}

impl<'a> TileCatalogBuilder<'a> {
    pub fn new(
        synthesizer: &'a TileAtlasSynthesizer,
        behaviors: &'a BehaviorRegistry,
        tree_chance: f64,
        frame_size: u32,
        seed: u64,
    ) -> Self {
        Self {
            synthesizer,
            behaviors,
            tree_chance,
            frame_size,
            seed,
        }
    }

    /// Build definitions for every row, in order.
    ///
    /// Fails when a bridge sits on the last addressable layer or an
    /// animation strip is too wide to render.
    pub fn build(&self, rows: &[TileRow]) -> Result<TileCatalog> {
        let mut rng = seeded_rng(self.seed, "catalog");
        let mut tiles = Vec::with_capacity(rows.len());
        let mut atlases = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let mut tile = TileDefinition {
                id: row.id.clone(),
                tile_type: row.tile_type.clone(),
                preferred_layer: row.preferred_layer,
                passable: row.passable,
                blocks_sight: !row.passable,
                description: row.description.clone(),
                flammability: 0,
                animation_frames: None,
                animation_speed: None,
                wind_sway: None,
                supports_furniture: None,
                connects_layers: None,
                height_levels: Vec::new(),
            };

            if let Some(behavior) = self.behaviors.get(&row.id) {
                if let Some(animation) = behavior.animation {
                    let atlas = self.synthesizer.render(&row.id, animation.frame_count, self.frame_size)?;
                    tile.animation_frames = Some(atlas.frames.clone());
                    tile.animation_speed = Some(animation.speed);
                    atlases.push(atlas);
                }
                if behavior.wind_sway {
                    tile.wind_sway = Some(true);
                }
                if let Some(flammability) = behavior.flammability {
                    tile.flammability = flammability;
                }
                if let Some(blocks_sight) = behavior.blocks_sight {
                    tile.blocks_sight = blocks_sight;
                }
            }

            let stack = TileKind::from_tag(&row.tile_type).height_stack(index, row, self.tree_chance, &mut rng)?;
            tile.height_levels = stack.levels;
            tile.supports_furniture = stack.supports_furniture.then_some(true);
            tile.connects_layers = stack.connects_layers;

            log::debug!("Tile {} ({}): {} height levels", tile.id, tile.tile_type, tile.height_levels.len());
            tiles.push(tile);
        }

        log::info!("Built catalog: {} tiles, {} animated", tiles.len(), atlases.len());
        Ok(TileCatalog { tiles, atlases })
    }

    /// Parse raw `(column, value)` records and build. Any bad row aborts
    /// the whole build before a single definition is produced.
    pub fn build_from_records<'r, R, F>(&self, records: R) -> Result<TileCatalog>
    where
        R: IntoIterator<Item = F>,
        F: IntoIterator<Item = (&'r str, &'r str)>,
    {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, fields)| TileRow::from_fields(i, fields))
            .collect::<Result<Vec<_>>>()?;
        self.build(&rows)
    }
}
