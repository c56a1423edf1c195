use thiserror::Error;

/// Errors raised by engine construction and frame submission.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No surface could be created for the window.
    #[error("no GPU support: could not create a surface for the window")]
    NoGpuSupport(#[source] wgpu::CreateSurfaceError),

    /// A surface exists but the adapter reports no format it can present with.
    #[error("no GPU support: the adapter cannot present to this surface")]
    UnsupportedSurface,

    #[error("failed to find a suitable GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue")]
    Device(#[from] wgpu::RequestDeviceError),

    /// A resource the engine relies on is not in its registry.
    #[error("{kind} `{name}` is not registered")]
    MissingResource { kind: &'static str, name: String },

    #[error("glyph atlas must be {expected_width}x{expected_height}, got {width}x{height}")]
    AtlasSize {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("glyph atlas holds {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    AtlasData {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("surface ran out of memory while acquiring a frame")]
    SurfaceOutOfMemory,
}

impl EngineError {
    pub(crate) fn missing(kind: &'static str, name: &str) -> Self {
        Self::MissingResource {
            kind,
            name: name.to_string(),
        }
    }
}
