//! Output documents consumed by the game engine.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::config::CatalogConfig;
use super::world_map::{LayerGrid, WorldMap};
use crate::catalog::TileDefinition;
use crate::core::Result;
use crate::items::ItemRecord;
use crate::terrain::NoiseField;

/// `tilesets.json`
#[derive(Debug, Serialize)]
pub struct TileCatalogDocument<'a> {
    pub version: &'a str,
    pub map_layers: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tiles: &'a [TileDefinition],
}

impl<'a> TileCatalogDocument<'a> {
    pub fn new(config: &'a CatalogConfig, tiles: &'a [TileDefinition]) -> Self {
        Self {
            version: &config.version,
            map_layers: config.map_layers,
            tile_width: config.tile_width,
            tile_height: config.tile_height,
            tiles,
        }
    }
}

/// `map.json`: layer index to `[x][y]` cell lists, plus the noise fields.
#[derive(Debug, Serialize)]
pub struct WorldMapDocument<'a> {
    pub map: BTreeMap<u32, &'a LayerGrid>,
    pub biomes: BiomeFields<'a>,
}

#[derive(Debug, Serialize)]
pub struct BiomeFields<'a> {
    pub elev: &'a NoiseField,
    pub moist: &'a NoiseField,
}

impl<'a> WorldMapDocument<'a> {
    pub fn new(world: &'a WorldMap) -> Self {
        Self {
            map: world.layers.iter().enumerate().map(|(i, grid)| (i as u32, grid)).collect(),
            biomes: BiomeFields {
                elev: &world.elevation,
                moist: &world.moisture,
            },
        }
    }
}

/// `items.json`
#[derive(Debug, Serialize)]
pub struct ItemsDocument<'a> {
    pub items: &'a [ItemRecord],
}

/// Write any document as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(document: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
