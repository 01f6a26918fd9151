//! Per-tile behavior overrides keyed by tile id.

use std::collections::HashMap;

/// Animation attached to a tile. Frames are rendered by the atlas synthesizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub frame_count: u32,
    /// Seconds per frame.
    pub speed: f32,
}

/// Overrides applied on top of a tile's baseline row fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileBehavior {
    pub animation: Option<AnimationSpec>,
    pub wind_sway: bool,
    /// 0-100. `None` keeps the baseline of 0.
    pub flammability: Option<u8>,
    /// Overrides the `!passable` default.
    pub blocks_sight: Option<bool>,
}

impl TileBehavior {
    pub fn animated(frame_count: u32, speed: f32) -> Self {
        Self {
            animation: Some(AnimationSpec { frame_count, speed }),
            ..Self::default()
        }
    }

    pub fn with_wind_sway(mut self) -> Self {
        self.wind_sway = true;
        self
    }

    pub fn with_flammability(mut self, flammability: u8) -> Self {
        self.flammability = Some(flammability.min(100));
        self
    }

    pub fn with_blocks_sight(mut self, blocks_sight: bool) -> Self {
        self.blocks_sight = Some(blocks_sight);
        self
    }
}

/// Registry of tile-specific behavior. Tiles without an entry keep their
/// baseline fields.
#[derive(Clone, Debug)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, TileBehavior>,
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("water_wave", TileBehavior::animated(4, 0.2));
        registry.register("grass_wispy", TileBehavior::animated(2, 0.1).with_wind_sway());
        registry.register("grass_tuft", TileBehavior::default().with_flammability(80));
        registry.register("tree_oak", TileBehavior::default().with_flammability(90));
        registry
    }
}

impl BehaviorRegistry {
    pub fn empty() -> Self {
        Self { behaviors: HashMap::new() }
    }

    pub fn register(&mut self, tile_id: impl Into<String>, behavior: TileBehavior) {
        self.behaviors.insert(tile_id.into(), behavior);
    }

    pub fn get(&self, tile_id: &str) -> Option<&TileBehavior> {
        self.behaviors.get(tile_id)
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}
