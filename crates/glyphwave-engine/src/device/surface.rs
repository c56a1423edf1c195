use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::EngineError;

use super::error::classify_surface_error;
use super::{AcquiredFrame, GpuDevice, SurfaceErrorAction};

/// Something the engine can draw a frame into.
///
/// Implemented by [`WindowSurface`] (a swapchain bound to a window) and
/// [`OffscreenTarget`] (a plain texture, used headless and in tests).
pub trait FrameTarget {
    /// Pixel format of the images handed out by [`FrameTarget::acquire`].
    fn format(&self) -> wgpu::TextureFormat;

    /// Current drawable size in physical pixels.
    fn size(&self) -> PhysicalSize<u32>;

    /// Applies a new drawable size.
    ///
    /// A zero-area size is recorded but not applied to the GPU object.
    fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>);

    /// Acquires the image for the next frame.
    fn acquire(&mut self) -> Result<AcquiredFrame, wgpu::SurfaceError>;

    /// Handles a failed [`FrameTarget::acquire`].
    fn recover(&mut self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction;

    /// Presents a frame after its commands were submitted.
    fn present(&mut self, frame: AcquiredFrame) {
        frame.present();
    }
}

/// Swapchain surface bound to a window.
///
/// Surface lifetime is tied to the window via `'w`; the window must outlive this value.
pub struct WindowSurface<'w> {
    window: &'w Window,
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl<'w> WindowSurface<'w> {
    /// Acquires and configures a surface for `window`.
    ///
    /// Fails with [`EngineError::NoGpuSupport`] when no surface can be created and with
    /// [`EngineError::UnsupportedSurface`] when the adapter cannot present to it.
    pub fn new(gpu: &GpuDevice, window: &'w Window) -> Result<Self, EngineError> {
        let surface = Self::create_surface(gpu.instance(), window)?;
        Self::from_surface(gpu, window, surface)
    }

    /// Creates an unconfigured surface for `window`.
    ///
    /// Use this before the device exists, to request an adapter compatible with it.
    pub fn create_surface(
        instance: &wgpu::Instance,
        window: &'w Window,
    ) -> Result<wgpu::Surface<'w>, EngineError> {
        instance
            .create_surface(window)
            .map_err(EngineError::NoGpuSupport)
    }

    /// Configures a surface created by [`WindowSurface::create_surface`] on `gpu`'s instance.
    pub fn from_surface(
        gpu: &GpuDevice,
        window: &'w Window,
        surface: wgpu::Surface<'w>,
    ) -> Result<Self, EngineError> {
        let init = gpu.init();
        let size = window.inner_size();

        let caps = surface.get_capabilities(gpu.adapter());
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(EngineError::UnsupportedSurface)?;

        let format_usages = gpu
            .adapter()
            .get_texture_format_features(format)
            .allowed_usages;
        let usage = surface_usage(init.surface_storage, caps.usages, format_usages);

        let present_mode = if caps.present_modes.contains(&init.present_mode) {
            init.present_mode
        } else {
            log::warn!(
                "present mode {:?} unsupported, falling back to Fifo",
                init.present_mode
            );
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        if size.width > 0 && size.height > 0 {
            surface.configure(gpu.device(), &config);
        }

        log::debug!(
            "configured window surface: {:?} {}x{} usage {:?}",
            format,
            config.width,
            config.height,
            usage
        );

        Ok(Self {
            window,
            surface,
            config,
            size,
        })
    }
}

impl FrameTarget for WindowSurface<'_> {
    fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// wgpu does not support configuring a surface with a 0x0 size; in that case only
    /// the recorded size changes and configuration is deferred.
    fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.size = size;
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(device, &self.config);
    }

    fn acquire(&mut self) -> Result<AcquiredFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(AcquiredFrame {
            view,
            surface_texture: Some(surface_texture),
        })
    }

    fn recover(&mut self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured
            && self.size.width > 0
            && self.size.height > 0
        {
            self.surface.configure(device, &self.config);
        }
        action
    }

    fn present(&mut self, frame: AcquiredFrame) {
        self.window.pre_present_notify();
        frame.present();
    }
}

/// Texture-backed frame target with no window.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
}

impl OffscreenTarget {
    pub const DEFAULT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>, format: wgpu::TextureFormat) -> Self {
        Self {
            texture: create_offscreen_texture(device, size, format),
            format,
            size,
        }
    }

    /// The texture frames are rendered into.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl FrameTarget for OffscreenTarget {
    fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.size = size;
        if size.width == 0 || size.height == 0 {
            return;
        }

        let current = self.texture.size();
        if current.width != size.width || current.height != size.height {
            self.texture.destroy();
            self.texture = create_offscreen_texture(device, size, self.format);
        }
    }

    fn acquire(&mut self) -> Result<AcquiredFrame, wgpu::SurfaceError> {
        Ok(AcquiredFrame {
            view: self
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            surface_texture: None,
        })
    }

    fn recover(&mut self, _device: &wgpu::Device, _err: wgpu::SurfaceError) -> SurfaceErrorAction {
        SurfaceErrorAction::SkipFrame
    }
}

fn create_offscreen_texture(
    device: &wgpu::Device,
    size: PhysicalSize<u32>,
    format: wgpu::TextureFormat,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glyphwave offscreen target"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Surface usage: always `RENDER_ATTACHMENT`, plus `STORAGE_BINDING` when requested and
/// allowed by both the surface and the chosen format.
pub(crate) fn surface_usage(
    want_storage: bool,
    surface_usages: wgpu::TextureUsages,
    format_usages: wgpu::TextureUsages,
) -> wgpu::TextureUsages {
    let base = wgpu::TextureUsages::RENDER_ATTACHMENT;
    if !want_storage {
        return base;
    }

    let storage = wgpu::TextureUsages::STORAGE_BINDING;
    if surface_usages.contains(storage) && format_usages.contains(storage) {
        base | storage
    } else {
        log::warn!("surface does not allow storage binding; using render attachment only");
        base
    }
}
