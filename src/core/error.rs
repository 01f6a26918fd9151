//! Error types for the tilegen pipeline

use thiserror::Error;

/// Main error type for asset generation
#[derive(Debug, Error)]
pub enum Error {
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: malformed value {value:?} for field `{field}`")]
    MalformedField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("atlas for `{tile_id}` is too large: {frame_count} frames of {frame_size}px")]
    AtlasTooLarge {
        tile_id: String,
        frame_count: u32,
        frame_size: u32,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
