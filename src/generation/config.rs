//! Generation configuration.
//!
//! Every section has a `Default` matching the stock asset set, and
//! `#[serde(default)]` lets a JSON file override only what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::Result;

/// Top-level configuration for a generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for every stochastic stage.
    pub seed: u64,
    pub world: WorldConfig,
    pub catalog: CatalogConfig,
    pub items: ItemConfig,
    pub output: OutputConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world: WorldConfig::default(),
            catalog: CatalogConfig::default(),
            items: ItemConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Load from a JSON file (sync). Missing keys keep their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json).map_err(Error::from)
    }

    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.catalog.validate()?;
        self.items.validate()
    }
}

/// World map dimensions and placement rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub layers: u32,
    /// Noise octaves for both elevation and moisture (>= 1).
    pub octaves: u32,
    pub persistence: f64,
    /// Layers filled from the biome palette. Layer 0 is always caves.
    pub ground_layers: Vec<u32>,
    pub rock_tile: String,
    /// Chance of a rock on a cave-layer cell.
    pub cave_rock_chance: f64,
    /// Chance of a rock on an open-air-layer cell.
    pub air_rock_chance: f64,
    /// Chance a ground cell is replaced by a furniture tile.
    pub furniture_chance: f64,
    pub furniture_tiles: Vec<String>,
    pub bridge: Option<BridgeCorridor>,
    /// Tiles that may carry a second occupant at height 1.
    pub stack_rules: Vec<StackRule>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            layers: 6,
            octaves: 4,
            persistence: 0.5,
            ground_layers: vec![1, 2],
            rock_tile: "rock_boulder".to_string(),
            cave_rock_chance: 0.1,
            air_rock_chance: 0.1,
            furniture_chance: 0.1,
            furniture_tiles: vec!["table_wooden".to_string(), "chair_wooden".to_string()],
            bridge: Some(BridgeCorridor::default()),
            stack_rules: vec![
                StackRule { tile: "tree_oak".to_string(), chance: 0.5 },
                StackRule { tile: "table_wooden".to_string(), chance: 1.0 },
            ],
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(config_error(format!("world size {}x{} must be non-zero", self.width, self.height)));
        }
        if self.layers == 0 {
            return Err(config_error("world needs at least one layer"));
        }
        if self.octaves == 0 {
            return Err(config_error("noise needs at least one octave"));
        }
        check_chance("cave_rock_chance", self.cave_rock_chance)?;
        check_chance("air_rock_chance", self.air_rock_chance)?;
        check_chance("furniture_chance", self.furniture_chance)?;
        for rule in &self.stack_rules {
            check_chance(&format!("stack_rules[{}].chance", rule.tile), rule.chance)?;
        }
        if self.furniture_tiles.is_empty() {
            return Err(config_error("furniture_tiles must not be empty"));
        }
        if self.ground_layers.contains(&0) {
            return Err(config_error("layer 0 is reserved for caves"));
        }
        if let Some(bridge) = &self.bridge {
            if bridge.layer == 0 || self.ground_layers.contains(&bridge.layer) {
                return Err(config_error(format!("bridge layer {} overlaps caves or ground", bridge.layer)));
            }
            if bridge.layer >= self.layers
                || bridge.x >= self.width
                || bridge.y_start >= bridge.y_end
                || bridge.y_end > self.height
            {
                return Err(config_error(format!(
                    "bridge corridor (layer {}, x {}, y {}..{}) outside {}x{}x{} world",
                    bridge.layer, bridge.x, bridge.y_start, bridge.y_end,
                    self.width, self.height, self.layers
                )));
            }
        }
        Ok(())
    }
}

/// Straight bridge along one x column over `y_start..y_end`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeCorridor {
    pub layer: u32,
    pub x: usize,
    pub y_start: usize,
    pub y_end: usize,
    pub tile: String,
}

impl Default for BridgeCorridor {
    fn default() -> Self {
        Self {
            layer: 3,
            x: 25,
            y_start: 10,
            y_end: 40,
            tile: "bridge_rope".to_string(),
        }
    }
}

impl BridgeCorridor {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x == self.x && (self.y_start..self.y_end).contains(&y)
    }
}

/// A tile that stacks a copy of itself at height 1 with the given chance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackRule {
    pub tile: String,
    pub chance: f64,
}

/// Tile catalog document header and catalog build settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub version: String,
    pub map_layers: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Edge length of one atlas frame in pixels.
    pub frame_size: u32,
    /// Chance a terrain tile gets a trunk/branches/leaves stack.
    pub tree_chance: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            version: "1.4".to_string(),
            map_layers: 6,
            tile_width: 64,
            tile_height: 32,
            frame_size: 64,
            tree_chance: 0.2,
        }
    }
}

impl CatalogConfig {
    /// Largest accepted atlas frame edge, in pixels.
    pub const MAX_FRAME_SIZE: u32 = 4096;

    pub fn validate(&self) -> Result<()> {
        if self.frame_size == 0 || self.frame_size > Self::MAX_FRAME_SIZE {
            return Err(config_error(format!(
                "frame_size = {} must be in 1..={}",
                self.frame_size,
                Self::MAX_FRAME_SIZE
            )));
        }
        check_chance("tree_chance", self.tree_chance)
    }
}

/// Worn item variant settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    pub worn_chance: f64,
    pub worn_suffix: String,
    pub worn_durability_factor: f64,
    pub worn_price_factor: f64,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            worn_chance: 0.5,
            worn_suffix: "_rusted".to_string(),
            worn_durability_factor: 0.7,
            worn_price_factor: 0.8,
        }
    }
}

impl ItemConfig {
    pub fn validate(&self) -> Result<()> {
        check_chance("worn_chance", self.worn_chance)
    }
}

/// Where generated files go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON documents (`tilesets.json`, `map.json`, `items.json`).
    pub data_dir: PathBuf,
    /// Atlas PNGs.
    pub tiles_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            tiles_dir: PathBuf::from("assets/graphics/tiles"),
        }
    }
}

impl OutputConfig {
    /// Both directories under a common root.
    pub fn under(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: root.join(defaults.data_dir),
            tiles_dir: root.join(defaults.tiles_dir),
        }
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config(message.into())
}

fn check_chance(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(config_error(format!("{} = {} is not a probability", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        GenerationConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GenerationConfig = serde_json::from_str(
            r#"{"seed": 7, "world": {"width": 60, "bridge": {"x": 30}}}"#,
        ).expect("parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.width, 60);
        assert_eq!(config.world.height, 50);
        let bridge = config.world.bridge.as_ref().unwrap();
        assert_eq!(bridge.x, 30);
        assert_eq!(bridge.layer, 3);
        assert_eq!(config.catalog.version, "1.4");
    }

    #[test]
    fn test_null_bridge_disables_it() {
        let config: GenerationConfig = serde_json::from_str(r#"{"world": {"layers": 2, "bridge": null}}"#)
            .expect("parse");
        assert!(config.world.bridge.is_none());
        config.validate().expect("two-layer world without a bridge is valid");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = GenerationConfig::default();
        config.world.furniture_chance = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = GenerationConfig::default();
        config.world.width = 20;
        assert!(config.validate().is_err(), "bridge x=25 is outside a 20-wide world");

        let mut config = GenerationConfig::default();
        config.world.octaves = 0;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.world.ground_layers = vec![1, 3];
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.catalog.frame_size = 0;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.catalog.frame_size = CatalogConfig::MAX_FRAME_SIZE + 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.catalog.frame_size = CatalogConfig::MAX_FRAME_SIZE;
        config.validate().expect("largest frame size is accepted");
    }

    #[test]
    fn test_save_load_sync() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested/config.json");

        let mut config = GenerationConfig::default();
        config.seed = 1234;
        config.world.layers = 8;
        config.save_sync(&path).expect("save failed");

        let loaded = GenerationConfig::load_sync(&path).expect("load failed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_corridor_contains() {
        let bridge = BridgeCorridor::default();
        assert!(bridge.contains(25, 10));
        assert!(bridge.contains(25, 39));
        assert!(!bridge.contains(25, 40));
        assert!(!bridge.contains(24, 20));
    }
}
