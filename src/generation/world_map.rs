//! Multi-layer world map construction.
//!
//! Each layer has a role that decides how its cells are filled:
//! - Caves (layer 0): sparse rocks
//! - Ground: biome palette pick from elevation/moisture, with furniture overrides
//! - Bridge: a fixed straight corridor, empty elsewhere
//! - Air (everything else): sparse rocks
//!
//! After the base occupant is chosen, stack rules may add a height-1 occupant.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::config::WorldConfig;
use crate::core::seed::seeded_rng;
use crate::core::EMPTY_TILE;
use crate::terrain::{Biome, BiomePalette, NoiseField, NoiseParams};

/// One tile at one height inside a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub height: u32,
    pub tile: String,
}

impl Occupant {
    pub fn new(height: u32, tile: impl Into<String>) -> Self {
        Self { height, tile: tile.into() }
    }
}

/// Occupants of a single `(layer, x, y)` cell, ordered by height.
/// Never empty; the first occupant is always at height 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldCell {
    occupants: Vec<Occupant>,
}

impl WorldCell {
    pub fn ground(tile: impl Into<String>) -> Self {
        Self { occupants: vec![Occupant::new(0, tile)] }
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    /// The height-0 occupant.
    pub fn base_tile(&self) -> &str {
        &self.occupants[0].tile
    }

    fn stack(&mut self, tile: impl Into<String>) {
        let height = self.occupants.len() as u32;
        self.occupants.push(Occupant::new(height, tile));
    }
}

/// How a layer is populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    Caves,
    Ground,
    Bridge,
    Air,
}

impl LayerRole {
    pub fn for_layer(layer: u32, config: &WorldConfig) -> Self {
        if layer == 0 {
            LayerRole::Caves
        } else if config.ground_layers.contains(&layer) {
            LayerRole::Ground
        } else if config.bridge.as_ref().is_some_and(|b| b.layer == layer) {
            LayerRole::Bridge
        } else {
            LayerRole::Air
        }
    }
}

/// A `[x][y]` grid of cells.
pub type LayerGrid = Vec<Vec<WorldCell>>;

/// Generated world: per-layer grids plus the source noise fields.
#[derive(Clone, Debug)]
pub struct WorldMap {
    pub width: usize,
    pub height: usize,
    pub layers: Vec<LayerGrid>,
    pub elevation: NoiseField,
    pub moisture: NoiseField,
}

impl WorldMap {
    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    pub fn cell(&self, layer: u32, x: usize, y: usize) -> &WorldCell {
        &self.layers[layer as usize][x][y]
    }

    /// Biome of ground cell `(x, y)`, recomputed from the retained fields.
    pub fn biome_at(&self, x: usize, y: usize) -> Biome {
        Biome::classify(self.elevation.get(x, y), self.moisture.get(x, y))
    }

    /// Iterate `(layer, x, y, cell)` in generation order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, usize, usize, &WorldCell)> {
        self.layers.iter().enumerate().flat_map(|(layer, grid)| {
            grid.iter().enumerate().flat_map(move |(x, column)| {
                column.iter().enumerate().map(move |(y, cell)| (layer as u32, x, y, cell))
            })
        })
    }
}

/// Builds a `WorldMap` from a `WorldConfig`.
pub struct WorldMapBuilder<'a> {
    config: &'a WorldConfig,
    palette: &'a BiomePalette,
}

impl<'a> WorldMapBuilder<'a> {
    pub fn new(config: &'a WorldConfig, palette: &'a BiomePalette) -> Self {
        Self { config, palette }
    }

    /// Generate the world for `seed`.
    ///
    /// Elevation uses `seed` and moisture `seed + 1`; cell choices come from
    /// a separate stream, so the same seed always yields the same map.
    pub fn build(&self, seed: u64) -> WorldMap {
        let start = std::time::Instant::now();
        let WorldConfig { width, height, layers, .. } = *self.config;

        let noise = |seed| NoiseField::generate(&NoiseParams {
            width,
            height,
            seed,
            octaves: self.config.octaves,
            persistence: self.config.persistence,
        });
        let elevation = noise(seed);
        let moisture = noise(seed.wrapping_add(1));

        let mut rng = seeded_rng(seed, "world");
        let grids: Vec<LayerGrid> = (0..layers)
            .map(|layer| {
                let role = LayerRole::for_layer(layer, self.config);
                (0..width)
                    .map(|x| {
                        (0..height)
                            .map(|y| {
                                let tile = self.base_tile(role, x, y, &elevation, &moisture, &mut rng);
                                self.stacked_cell(tile, &mut rng)
                            })
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        log::info!(
            "Generated {}x{} world with {} layers in {:.1}ms",
            width, height, layers, start.elapsed().as_secs_f64() * 1000.0
        );

        WorldMap { width, height, layers: grids, elevation, moisture }
    }

    fn base_tile(
        &self,
        role: LayerRole,
        x: usize,
        y: usize,
        elevation: &NoiseField,
        moisture: &NoiseField,
        rng: &mut ChaCha8Rng,
    ) -> String {
        let config = self.config;
        match role {
            LayerRole::Caves | LayerRole::Air => {
                let chance = if role == LayerRole::Caves { config.cave_rock_chance } else { config.air_rock_chance };
                if rng.random::<f64>() < chance {
                    config.rock_tile.clone()
                } else {
                    EMPTY_TILE.to_string()
                }
            }
            LayerRole::Ground => {
                let biome = Biome::classify(elevation.get(x, y), moisture.get(x, y));
                let tile = self.palette.pick(biome, rng).to_string();
                if rng.random::<f64>() < config.furniture_chance {
                    let furniture = &config.furniture_tiles;
                    furniture[rng.random_range(0..furniture.len())].clone()
                } else {
                    tile
                }
            }
            LayerRole::Bridge => match &config.bridge {
                Some(bridge) if bridge.contains(x, y) => bridge.tile.clone(),
                _ => EMPTY_TILE.to_string(),
            },
        }
    }

    fn stacked_cell(&self, tile: String, rng: &mut ChaCha8Rng) -> WorldCell {
        let rule = self.config.stack_rules.iter().find(|r| r.tile == tile);
        let mut cell = WorldCell::ground(tile);
        if let Some(rule) = rule {
            if rule.chance >= 1.0 || rng.random::<f64>() < rule.chance {
                cell.stack(rule.tile.clone());
            }
        }
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::config::BridgeCorridor;

    fn build(config: &WorldConfig, seed: u64) -> WorldMap {
        WorldMapBuilder::new(config, &BiomePalette::default()).build(seed)
    }

    #[test]
    fn test_dimensions() {
        let config = WorldConfig::default();
        let map = build(&config, 42);
        assert_eq!(map.layer_count(), 6);
        assert_eq!(map.layers[0].len(), 50);
        assert_eq!(map.layers[5][49].len(), 50);
        assert_eq!(map.elevation.width(), 50);
        assert_eq!(map.moisture.height(), 50);
    }

    #[test]
    fn test_cells_start_at_height_zero() {
        let map = build(&WorldConfig::default(), 42);
        for (layer, x, y, cell) in map.cells() {
            assert!(!cell.occupants().is_empty(), "cell ({layer},{x},{y}) empty");
            assert_eq!(cell.occupants()[0].height, 0);
            for (i, occupant) in cell.occupants().iter().enumerate() {
                assert_eq!(occupant.height as usize, i);
            }
        }
    }

    #[test]
    fn test_bridge_only_in_corridor() {
        let config = WorldConfig::default();
        let bridge = config.bridge.clone().unwrap();
        let map = build(&config, 42);

        for x in 0..map.width {
            for y in 0..map.height {
                let tile = map.cell(bridge.layer, x, y).base_tile();
                if bridge.contains(x, y) {
                    assert_eq!(tile, "bridge_rope");
                } else {
                    assert_eq!(tile, EMPTY_TILE, "unexpected {} at ({x},{y})", tile);
                }
            }
        }
        for (layer, _, _, cell) in map.cells() {
            if layer != bridge.layer {
                assert_ne!(cell.base_tile(), "bridge_rope");
            }
        }
    }

    #[test]
    fn test_layer_roles() {
        let config = WorldConfig::default();
        assert_eq!(LayerRole::for_layer(0, &config), LayerRole::Caves);
        assert_eq!(LayerRole::for_layer(1, &config), LayerRole::Ground);
        assert_eq!(LayerRole::for_layer(2, &config), LayerRole::Ground);
        assert_eq!(LayerRole::for_layer(3, &config), LayerRole::Bridge);
        assert_eq!(LayerRole::for_layer(4, &config), LayerRole::Air);

        let no_bridge = WorldConfig { bridge: None, ..WorldConfig::default() };
        assert_eq!(LayerRole::for_layer(3, &no_bridge), LayerRole::Air);
    }

    #[test]
    fn test_sparse_layers_hold_rocks_or_empty() {
        let map = build(&WorldConfig::default(), 7);
        let mut rocks = 0;
        let mut total = 0;
        for (layer, _, _, cell) in map.cells() {
            if layer == 0 || layer >= 4 {
                let tile = cell.base_tile();
                assert!(tile == EMPTY_TILE || tile == "rock_boulder");
                assert_eq!(cell.occupants().len(), 1);
                rocks += usize::from(tile == "rock_boulder");
                total += 1;
            }
        }
        let ratio = rocks as f64 / total as f64;
        assert!(ratio > 0.05 && ratio < 0.15, "rock ratio {}", ratio);
    }

    #[test]
    fn test_ground_tiles_follow_biome() {
        let config = WorldConfig { furniture_chance: 0.0, ..WorldConfig::default() };
        let palette = BiomePalette::default();
        let map = build(&config, 3);
        for layer in [1, 2] {
            for x in 0..map.width {
                for y in 0..map.height {
                    let tile = map.cell(layer, x, y).base_tile();
                    let candidates = palette.tiles_for(map.biome_at(x, y));
                    assert!(candidates.iter().any(|c| c == tile), "{} not in {:?}", tile, candidates);
                }
            }
        }
    }

    #[test]
    fn test_furniture_override() {
        let config = WorldConfig { furniture_chance: 1.0, ..WorldConfig::default() };
        let map = build(&config, 3);
        for x in 0..map.width {
            for y in 0..map.height {
                let cell = map.cell(1, x, y);
                match cell.base_tile() {
                    "table_wooden" => assert_eq!(cell.occupants().len(), 2),
                    "chair_wooden" => assert_eq!(cell.occupants().len(), 1),
                    other => panic!("expected furniture, got {}", other),
                }
            }
        }
    }

    #[test]
    fn test_tree_stacking() {
        let config = WorldConfig { furniture_chance: 0.0, ..WorldConfig::default() };
        let map = build(&config, 11);
        let mut trees = 0;
        let mut stacked = 0;
        for (_, _, _, cell) in map.cells() {
            if cell.base_tile() == "tree_oak" {
                trees += 1;
                if cell.occupants().len() == 2 {
                    assert_eq!(cell.occupants()[1], Occupant::new(1, "tree_oak"));
                    stacked += 1;
                }
            } else if cell.base_tile() != "table_wooden" {
                assert_eq!(cell.occupants().len(), 1);
            }
        }
        if trees > 20 {
            assert!(stacked > 0 && stacked < trees, "{} of {} trees stacked", stacked, trees);
        }
    }

    #[test]
    fn test_reproducible() {
        let config = WorldConfig::default();
        let a = build(&config, 42);
        let b = build(&config, 42);
        assert_eq!(a.layers, b.layers);
        assert_eq!(a.elevation, b.elevation);
        assert_ne!(a.elevation, a.moisture);

        let c = build(&config, 43);
        assert_ne!(a.layers, c.layers);
    }

    #[test]
    fn test_custom_corridor() {
        let config = WorldConfig {
            width: 8,
            height: 8,
            layers: 3,
            ground_layers: vec![1],
            bridge: Some(BridgeCorridor { layer: 2, x: 3, y_start: 2, y_end: 5, ..BridgeCorridor::default() }),
            ..WorldConfig::default()
        };
        config.validate().expect("valid config");
        let map = build(&config, 5);
        let bridged: Vec<_> = map.cells()
            .filter(|(_, _, _, c)| c.base_tile() == "bridge_rope")
            .map(|(l, x, y, _)| (l, x, y))
            .collect();
        assert_eq!(bridged, vec![(2, 3, 2), (2, 3, 3), (2, 3, 4)]);
    }

    #[test]
    fn test_cell_serializes_as_list() {
        let mut cell = WorldCell::ground("table_wooden");
        cell.stack("table_wooden");
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json, serde_json::json!([
            {"height": 0, "tile": "table_wooden"},
            {"height": 1, "tile": "table_wooden"},
        ]));
    }
}
