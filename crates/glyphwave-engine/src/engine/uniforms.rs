use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

/// Current drawable dimensions in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (e.g. a minimized window).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_f32(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

impl From<PhysicalSize<u32>> for CanvasSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Per-frame uniform block, bound at group 0 binding 0.
///
/// Matches the WGSL struct `{ resolution: vec2<f32>, time: f32 }`, whose size rounds up
/// to 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub _pad: f32,
}

const _: () = assert!(std::mem::size_of::<FrameUniforms>() == 16);

impl FrameUniforms {
    /// Byte size of the uniform buffer.
    pub const SIZE: u64 = std::mem::size_of::<FrameUniforms>() as u64;

    pub fn new(size: CanvasSize, time: f32) -> Self {
        Self {
            resolution: size.to_f32(),
            time,
            _pad: 0.0,
        }
    }

    /// The three floats written each frame; the padding word is never rewritten.
    pub fn payload(&self) -> [f32; 3] {
        [self.resolution[0], self.resolution[1], self.time]
    }
}
