//! Glyphwave engine crate.
//!
//! A small wgpu engine that keeps its GPU resources in name-keyed registries and renders
//! a full-screen ASCII-art effect driven by a per-frame uniform block and a glyph atlas.

pub mod device;
pub mod engine;
pub mod error;
pub mod logging;
pub mod registry;
pub mod time;
pub mod window;

pub use device::{GpuDevice, GpuInit};
pub use engine::{DrawMode, Engine, EngineAssets, EngineConfig, GlyphImage};
pub use error::EngineError;
