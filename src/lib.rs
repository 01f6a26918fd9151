//! Tilegen - offline world and tile-texture asset generator

pub mod core;
pub mod terrain;
pub mod atlas;
pub mod catalog;
pub mod items;
pub mod generation;
