//! Tile definitions and per-type height stacks.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::row::TileRow;
use crate::core::error::Error;
use crate::core::Result;

/// Closed set of tile categories, each with its own height-stack strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Terrain,
    Furniture,
    Bridge,
    Other,
}

impl TileKind {
    /// Map a raw type tag to a kind. Unrecognized tags are `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "terrain" => TileKind::Terrain,
            "furniture" => TileKind::Furniture,
            "bridge" => TileKind::Bridge,
            _ => TileKind::Other,
        }
    }

    /// Build the height levels for a row of this kind.
    ///
    /// Terrain rows become a trunk/branches/leaves stack with chance
    /// `tree_chance`, drawn from `rng`; the other kinds never draw.
    /// `index` is the row's source position, reported when a bridge has no
    /// layer above it.
    pub fn height_stack<R: Rng + ?Sized>(
        &self,
        index: usize,
        row: &TileRow,
        tree_chance: f64,
        rng: &mut R,
    ) -> Result<HeightStack> {
        let id = row.id.as_str();
        let tree = *self == TileKind::Terrain && rng.random::<f64>() < tree_chance;
        let stack = match self {
            TileKind::Terrain if tree => HeightStack {
                levels: vec![
                    HeightLevel::new(0, false, false, format!("{}_trunk.png", id)),
                    HeightLevel::new(1, true, true, format!("{}_branches.png", id)),
                    HeightLevel::new(2, true, true, format!("{}_leaves.png", id)),
                ],
                ..HeightStack::default()
            },
            TileKind::Furniture => HeightStack {
                levels: vec![
                    HeightLevel::new(0, row.passable, row.transparent, format!("{}_base.png", id)),
                    HeightLevel::new(1, false, false, format!("{}_top.png", id)),
                ],
                supports_furniture: true,
                ..HeightStack::default()
            },
            TileKind::Bridge => {
                let upper = row.preferred_layer.checked_add(1).ok_or_else(|| Error::MalformedField {
                    row: index,
                    field: "preferred_layer",
                    value: row.preferred_layer.to_string(),
                })?;
                HeightStack {
                    levels: vec![HeightLevel::new(0, true, true, format!("{}.png", id))],
                    connects_layers: Some([row.preferred_layer, upper]),
                    ..HeightStack::default()
                }
            }
            TileKind::Terrain | TileKind::Other => HeightStack {
                levels: vec![HeightLevel::new(0, row.passable, row.transparent, format!("{}.png", id))],
                ..HeightStack::default()
            },
        };
        Ok(stack)
    }
}

/// Output of a kind's stack strategy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightStack {
    pub levels: Vec<HeightLevel>,
    pub supports_furniture: bool,
    pub connects_layers: Option<[u32; 2]>,
}

/// One vertical slice of a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightLevel {
    pub height: u32,
    pub passable: bool,
    pub transparent: bool,
    /// View name to visual reference; always has `"default"`.
    pub views: BTreeMap<String, String>,
}

impl HeightLevel {
    pub const DEFAULT_VIEW: &'static str = "default";

    pub fn new(height: u32, passable: bool, transparent: bool, default_view: String) -> Self {
        let mut views = BTreeMap::new();
        views.insert(Self::DEFAULT_VIEW.to_string(), default_view);
        Self { height, passable, transparent, views }
    }
}

/// A fully resolved catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub tile_type: String,
    pub preferred_layer: u32,
    pub passable: bool,
    pub blocks_sight: bool,
    pub description: String,
    pub flammability: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_frames: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_sway: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_furniture: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connects_layers: Option<[u32; 2]>,
    pub height_levels: Vec<HeightLevel>,
}

impl TileDefinition {
    pub fn kind(&self) -> TileKind {
        TileKind::from_tag(&self.tile_type)
    }

    /// Height indices start at 0 and increase by one.
    pub fn has_contiguous_levels(&self) -> bool {
        !self.height_levels.is_empty()
            && self.height_levels.iter().enumerate().all(|(i, l)| l.height as usize == i)
    }
}
