//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime. One `FrameClock` per engine;
//! call `tick()` once per rendered frame to obtain `FrameTime`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
