//! Core generator types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod seed;

pub use types::*;
pub use error::Error;
