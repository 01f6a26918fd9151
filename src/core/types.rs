//! Core type aliases and shared tile ids

/// Standard Result type for the generator
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Placeholder occupant for cells with nothing in them.
pub const EMPTY_TILE: &str = "empty";
