//! Crosswalk - procedural pixel-art walkers paced by live payment statistics
//!
//! This library provides functionality to:
//! - Generate human and robot walking sprites from built-in palettes
//! - Cache mirrored sprite sheets per archetype and palette
//! - Simulate a lane of walkers whose arrival rate follows a live feed
//! - Render lanes headless to PNG and GIF

pub mod cli;
pub mod color;
pub mod config;
pub mod crosswalk;
pub mod dashboard;
#[cfg(feature = "live")]
pub mod feed;
pub mod models;
pub mod output;
pub mod palettes;
pub mod random;
pub mod renderer;
pub mod schedule;
pub mod sprite;
pub mod spritesheet;
pub mod stats;
pub mod surface;
#[cfg(feature = "wasm")]
pub mod wasm;
