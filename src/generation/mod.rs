//! Asset generation pipeline: builds every output document in memory, then writes.
//!
//! The pipeline orchestrates:
//! 1. Tile catalog construction (with animated tile atlases)
//! 2. World map construction (elevation/moisture noise → biome → layered cells)
//! 3. Optional item table merge
//! 4. Writing atlases and JSON documents once everything above succeeded

pub mod config;
pub mod world_map;
pub mod documents;

pub use config::{BridgeCorridor, CatalogConfig, GenerationConfig, ItemConfig, OutputConfig, StackRule, WorldConfig};
pub use world_map::{LayerRole, Occupant, WorldCell, WorldMap, WorldMapBuilder};
pub use documents::{ItemsDocument, TileCatalogDocument, WorldMapDocument};

use std::path::PathBuf;
use std::time::Instant;

use crate::atlas::{PainterRegistry, TileAtlasSynthesizer};
use crate::catalog::{BehaviorRegistry, TileCatalog, TileCatalogBuilder, TileRow};
use crate::core::Result;
use crate::items::{ItemRecord, ItemTable, ItemTableBuilder, SpellTables};
use crate::terrain::BiomePalette;

pub const CATALOG_FILE: &str = "tilesets.json";
pub const MAP_FILE: &str = "map.json";
pub const ITEMS_FILE: &str = "items.json";

/// Everything a run produces, not yet written.
#[derive(Clone, Debug)]
pub struct GeneratedAssets {
    pub catalog: TileCatalog,
    pub world: WorldMap,
    pub items: Option<Vec<ItemRecord>>,
    catalog_config: CatalogConfig,
}

/// Files written by `GeneratedAssets::write`.
#[derive(Clone, Debug, Default)]
pub struct WrittenFiles {
    pub atlases: Vec<PathBuf>,
    pub catalog: PathBuf,
    pub map: PathBuf,
    pub items: Option<PathBuf>,
}

impl GeneratedAssets {
    /// Write atlases, then the catalog, map and item documents.
    pub fn write(&self, output: &OutputConfig) -> Result<WrittenFiles> {
        let start = Instant::now();

        let atlases = self
            .catalog
            .atlases
            .iter()
            .map(|atlas| atlas.save(&output.tiles_dir))
            .collect::<Result<Vec<_>>>()?;

        let catalog = output.data_dir.join(CATALOG_FILE);
        documents::save_json(&TileCatalogDocument::new(&self.catalog_config, &self.catalog.tiles), &catalog)?;

        let map = output.data_dir.join(MAP_FILE);
        documents::save_json(&WorldMapDocument::new(&self.world), &map)?;

        let items = match &self.items {
            Some(items) => {
                let path = output.data_dir.join(ITEMS_FILE);
                documents::save_json(&ItemsDocument { items }, &path)?;
                Some(path)
            }
            None => None,
        };

        log::info!(
            "Wrote {} atlases and {} documents in {:.1}ms",
            atlases.len(),
            2 + usize::from(items.is_some()),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(WrittenFiles { atlases, catalog, map, items })
    }
}

/// Orchestrates a full generation run from one `GenerationConfig`.
pub struct GenerationPipeline {
    config: GenerationConfig,
    palette: BiomePalette,
    behaviors: BehaviorRegistry,
    synthesizer: TileAtlasSynthesizer,
    spells: SpellTables,
}

impl GenerationPipeline {
    /// Create a pipeline with the stock palette, behaviors and painters.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        let synthesizer = Self::synthesizer_for(&config, PainterRegistry::default());
        Ok(Self {
            config,
            palette: BiomePalette::default(),
            behaviors: BehaviorRegistry::default(),
            synthesizer,
            spells: SpellTables::default(),
        })
    }

    fn synthesizer_for(config: &GenerationConfig, painters: PainterRegistry) -> TileAtlasSynthesizer {
        TileAtlasSynthesizer::new(painters, config.seed, config.output.tiles_dir.clone())
    }

    pub fn with_palette(mut self, palette: BiomePalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn with_painters(mut self, painters: PainterRegistry) -> Self {
        self.synthesizer = Self::synthesizer_for(&self.config, painters);
        self
    }

    pub fn with_spells(mut self, spells: SpellTables) -> Self {
        self.spells = spells;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Build the tile catalog and world map.
    pub fn run(&self, rows: &[TileRow]) -> Result<GeneratedAssets> {
        let start = Instant::now();
        let seed = self.config.seed;
        let catalog_config = &self.config.catalog;

        let catalog = TileCatalogBuilder::new(
            &self.synthesizer,
            &self.behaviors,
            catalog_config.tree_chance,
            catalog_config.frame_size,
            seed,
        )
        .build(rows)?;

        let world = WorldMapBuilder::new(&self.config.world, &self.palette).build(seed);

        log::info!("Generation finished in {:.1}ms (seed {})", start.elapsed().as_secs_f64() * 1000.0, seed);

        Ok(GeneratedAssets {
            catalog,
            world,
            items: None,
            catalog_config: catalog_config.clone(),
        })
    }

    /// Like `run`, and also merge the item tables.
    pub fn run_with_items(&self, rows: &[TileRow], tables: &[ItemTable]) -> Result<GeneratedAssets> {
        let mut assets = self.run(rows)?;
        let items = ItemTableBuilder::new(&self.spells, &self.config.items, self.config.seed).build(tables);
        assets.items = Some(items);
        Ok(assets)
    }
}
