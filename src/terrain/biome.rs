//! Biome classification from elevation and moisture

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tile id used when a biome has no palette entry.
pub const FALLBACK_TILE: &str = "grass_tuft";

/// Biome types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Mountain,
    Swamp,
    Desert,
    Forest,
    Plains,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Mountain,
        Biome::Swamp,
        Biome::Desert,
        Biome::Forest,
        Biome::Plains,
    ];

    /// Classify a cell. Rules are checked in order and the first match wins:
    /// mountain, swamp, desert, forest, then plains as the fallback.
    pub fn classify(elevation: f64, moisture: f64) -> Self {
        if elevation > 0.7 {
            return Biome::Mountain;
        }
        if moisture > 0.7 {
            return Biome::Swamp;
        }
        if moisture < 0.3 && elevation < 0.3 {
            return Biome::Desert;
        }
        if moisture > 0.5 {
            return Biome::Forest;
        }
        Biome::Plains
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Mountain => "mountain",
            Biome::Swamp => "swamp",
            Biome::Desert => "desert",
            Biome::Forest => "forest",
            Biome::Plains => "plains",
        }
    }
}

/// Candidate ground tiles per biome.
///
/// Candidates are equally weighted; list a tile twice to favor it.
#[derive(Clone, Debug)]
pub struct BiomePalette {
    entries: HashMap<Biome, Vec<String>>,
    fallback: Vec<String>,
}

impl Default for BiomePalette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.insert(Biome::Forest, &["grass_wispy", "tree_oak"]);
        palette.insert(Biome::Plains, &["grass_tuft"]);
        palette.insert(Biome::Desert, &["sand_dune"]);
        palette.insert(Biome::Swamp, &["water_wave", "grass_tuft"]);
        palette.insert(Biome::Mountain, &["rock_boulder"]);
        palette
    }
}

impl BiomePalette {
    /// A palette with no entries; every lookup yields the fallback.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: vec![FALLBACK_TILE.to_string()],
        }
    }

    /// Replace the candidates for a biome. An empty list removes the entry.
    pub fn insert(&mut self, biome: Biome, tiles: &[&str]) {
        if tiles.is_empty() {
            self.entries.remove(&biome);
        } else {
            self.entries.insert(biome, tiles.iter().map(|t| t.to_string()).collect());
        }
    }

    /// Ordered candidate tile ids for a biome, never empty.
    pub fn tiles_for(&self, biome: Biome) -> &[String] {
        match self.entries.get(&biome) {
            Some(tiles) => tiles,
            None => {
                log::warn!("No palette for biome {}, using fallback", biome.as_str());
                &self.fallback
            }
        }
    }

    /// Pick one candidate uniformly.
    pub fn pick<R: Rng + ?Sized>(&self, biome: Biome, rng: &mut R) -> &str {
        let tiles = self.tiles_for(biome);
        &tiles[rng.random_range(0..tiles.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_mountain_precedes_swamp() {
        assert_eq!(Biome::classify(0.8, 0.8), Biome::Mountain);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(Biome::classify(0.2, 0.2), Biome::Desert);
        assert_eq!(Biome::classify(0.2, 0.6), Biome::Forest);
        assert_eq!(Biome::classify(0.2, 0.4), Biome::Plains);
        assert_eq!(Biome::classify(0.5, 0.9), Biome::Swamp);
        // Dry but too high for desert
        assert_eq!(Biome::classify(0.5, 0.1), Biome::Plains);
        // Thresholds are strict
        assert_eq!(Biome::classify(0.7, 0.7), Biome::Forest);
    }

    #[test]
    fn test_classify_total() {
        let steps = 40;
        for i in 0..=steps {
            for j in 0..=steps {
                let e = i as f64 / steps as f64;
                let m = j as f64 / steps as f64;
                let biome = Biome::classify(e, m);
                assert!(Biome::ALL.contains(&biome));
            }
        }
    }

    #[test]
    fn test_default_palette() {
        let palette = BiomePalette::default();
        assert_eq!(palette.tiles_for(Biome::Forest), &["grass_wispy", "tree_oak"]);
        assert_eq!(palette.tiles_for(Biome::Mountain), &["rock_boulder"]);
        for biome in Biome::ALL {
            assert!(!palette.tiles_for(biome).is_empty());
        }
    }

    #[test]
    fn test_palette_fallback() {
        let mut palette = BiomePalette::default();
        palette.insert(Biome::Desert, &[]);
        assert_eq!(palette.tiles_for(Biome::Desert), &[FALLBACK_TILE]);
        assert_eq!(BiomePalette::empty().tiles_for(Biome::Plains), &[FALLBACK_TILE]);
    }

    #[test]
    fn test_pick_within_candidates() {
        let palette = BiomePalette::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let tile = palette.pick(Biome::Swamp, &mut rng);
            assert!(tile == "water_wave" || tile == "grass_tuft");
            seen.insert(tile.to_string());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_biome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Biome::Mountain).unwrap(), "\"mountain\"");
        assert_eq!(Biome::Plains.as_str(), "plains");
    }
}
