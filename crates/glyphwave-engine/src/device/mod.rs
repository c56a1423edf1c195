//! GPU device + frame target management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring window surfaces (swapchains) and offscreen targets
//! - acquiring frame images and mapping acquisition failures to actions

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{classify_surface_error, SurfaceErrorAction};
pub use frame::AcquiredFrame;
pub use gpu::GpuDevice;
pub use init::GpuInit;
pub use surface::{FrameTarget, OffscreenTarget, WindowSurface};

#[cfg(test)]
pub(crate) use gpu::create_test_gpu;
