//! Item table merge.
//!
//! Concatenates per-category item tables, attaches spell metadata to
//! books, scrolls and spells, then appends worn variants of items that
//! have a numeric durability.

pub mod record;

pub use record::{ItemRecord, ItemTable, NO_DURABILITY};

use std::collections::HashMap;

use rand::Rng;

use crate::core::seed::seeded_rng;
use crate::generation::config::ItemConfig;

/// Charges given to spells missing from `SpellTables::spell_charges`.
pub const DEFAULT_SPELL_CHARGES: u32 = 1;

/// Spell metadata keyed by item id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpellTables {
    pub book_spells: HashMap<String, Vec<String>>,
    pub scroll_spells: HashMap<String, Vec<String>>,
    pub spell_charges: HashMap<String, u32>,
}

impl SpellTables {
    fn apply(&self, record: &mut ItemRecord) {
        let spells_of = |table: &HashMap<String, Vec<String>>| table.get(&record.id).cloned().unwrap_or_default();
        match record.category.as_str() {
            "books" => record.contained_spells = Some(spells_of(&self.book_spells)),
            "scrolls" => record.contained_spells = Some(spells_of(&self.scroll_spells)),
            "spells" => {
                record.charges = Some(self.spell_charges.get(&record.id).copied().unwrap_or(DEFAULT_SPELL_CHARGES));
            }
            _ => {}
        }
    }
}

/// Builds the resolved item list.
pub struct ItemTableBuilder<'a> {
    spells: &'a SpellTables,
    config: &'a ItemConfig,
    seed: u64,
}

impl<'a> ItemTableBuilder<'a> {
    pub fn new(spells: &'a SpellTables, config: &'a ItemConfig, seed: u64) -> Self {
        Self { spells, config, seed }
    }

    /// Merge `tables` in order, followed by all worn variants.
    pub fn build(&self, tables: &[ItemTable]) -> Vec<ItemRecord> {
        let mut items: Vec<ItemRecord> = tables
            .iter()
            .flat_map(|table| {
                table.records.iter().map(move |record| {
                    let mut record = record.clone();
                    record.category = table.category.clone();
                    self.spells.apply(&mut record);
                    record
                })
            })
            .collect();

        let mut rng = seeded_rng(self.seed, "items");
        let variants: Vec<ItemRecord> = items
            .iter()
            .filter_map(|item| {
                // One draw per item keeps the stream aligned regardless of durability.
                let roll = rng.random::<f64>();
                let durability = item.durability?;
                (roll < self.config.worn_chance).then(|| self.worn_variant(item, durability))
            })
            .collect();

        log::info!("Merged {} items from {} tables, {} worn variants", items.len(), tables.len(), variants.len());
        items.extend(variants);
        items
    }

    fn worn_variant(&self, item: &ItemRecord, durability: f64) -> ItemRecord {
        let mut variant = item.clone();
        variant.id = format!("{}{}", item.id, self.config.worn_suffix);
        variant.durability = Some(durability * self.config.worn_durability_factor);
        variant.price = item.price * self.config.worn_price_factor;
        variant
    }
}
