//! Item records as read from the per-category item tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker used by the item tables for items without durability.
pub const NO_DURABILITY: &str = "N/A";

/// One item. Columns the generator does not interpret are kept in `extra`
/// and written back unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    #[serde(default)]
    pub category: String,
    /// `None` for items written as `"N/A"`.
    #[serde(default, with = "durability")]
    pub durability: Option<f64>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contained_spells: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ItemRecord {
    pub fn new(id: impl Into<String>, durability: Option<f64>, price: f64) -> Self {
        Self {
            id: id.into(),
            category: String::new(),
            durability,
            price,
            contained_spells: None,
            charges: None,
            extra: BTreeMap::new(),
        }
    }
}

/// A category table, e.g. `books` or `weapons`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemTable {
    pub category: String,
    pub records: Vec<ItemRecord>,
}

mod durability {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_f64(*v),
            None => serializer.serialize_str(NO_DURABILITY),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(v)) => Ok(Some(v)),
            Some(Raw::Text(text)) => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case(NO_DURABILITY) {
                    Ok(None)
                } else {
                    text.parse::<f64>().map(Some).map_err(serde::de::Error::custom)
                }
            }
        }
    }
}
