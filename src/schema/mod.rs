//! Schema module - Configuration types for the viewport player.

mod config;

pub use config::*;
