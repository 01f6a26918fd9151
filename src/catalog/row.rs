//! Typed tile-definition source rows.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::Result;

/// One row of the tile definition table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRow {
    pub id: String,
    /// Raw type tag, kept verbatim for output.
    #[serde(rename = "type")]
    pub tile_type: String,
    pub preferred_layer: u32,
    pub passable: bool,
    pub transparent: bool,
    pub description: String,
}

impl TileRow {
    /// Build a row from already-parsed `(column, value)` pairs.
    ///
    /// `row` is the zero-based source index, used in error messages.
    /// Unknown columns are ignored. Every other column must be present;
    /// `description` is the only one allowed to be blank.
    pub fn from_fields<'a, I>(row: usize, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut id = None;
        let mut tile_type = None;
        let mut preferred_layer = None;
        let mut passable = None;
        let mut transparent = None;
        let mut description = None;

        for (column, value) in fields {
            let value = value.trim();
            match column.trim() {
                "id" => id = Some(value),
                "type" => tile_type = Some(value),
                "preferred_layer" => preferred_layer = Some(value),
                "passable" => passable = Some(value),
                "transparent" => transparent = Some(value),
                "description" => description = Some(value),
                _ => {}
            }
        }

        let id = required(row, "id", id)?;
        let tile_type = required(row, "type", tile_type)?;
        let layer_str = required(row, "preferred_layer", preferred_layer)?;
        let preferred_layer = layer_str.parse::<u32>().map_err(|_| Error::MalformedField {
            row,
            field: "preferred_layer",
            value: layer_str.to_string(),
        })?;
        let passable = parse_flag(row, "passable", required(row, "passable", passable)?)?;
        let transparent = parse_flag(row, "transparent", required(row, "transparent", transparent)?)?;
        let description = description.ok_or(Error::MissingField { row, field: "description" })?;

        Ok(Self {
            id: id.to_string(),
            tile_type: tile_type.to_string(),
            preferred_layer,
            passable,
            transparent,
            description: description.to_string(),
        })
    }
}

fn required<'a>(row: usize, field: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingField { row, field }),
    }
}

/// Parse a boolean-like cell: true/yes/1 or false/no/0, any case.
pub fn parse_flag(row: usize, field: &'static str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(Error::MalformedField {
            row,
            field,
            value: value.to_string(),
        }),
    }
}
