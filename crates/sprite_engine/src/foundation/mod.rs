//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math aliases, colors and rectangles for 2D work
//! - Arena key types backed by `slotmap`
//! - Frame timing
//! - Logging initialization

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
