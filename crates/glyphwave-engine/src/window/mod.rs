//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, and wires them to the engine.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, SceneSetup};
