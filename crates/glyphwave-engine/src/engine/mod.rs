//! The glyph engine: owns every GPU resource for the ASCII effect and renders it.
//!
//! Construction builds all resources once, in dependency order (see `setup`). Each
//! [`Engine::render`] writes the frame uniforms and records one render pass with a
//! single draw. [`Engine::resize`] updates the target size and renders immediately.

mod atlas;
mod config;
mod render;
mod setup;
mod uniforms;

pub use atlas::{GlyphImage, GLYPH_ATLAS_FORMAT, GLYPH_ATLAS_HEIGHT, GLYPH_ATLAS_WIDTH};
pub use config::{DrawMode, EngineConfig};
pub use render::FrameReport;
pub use uniforms::{CanvasSize, FrameUniforms};

use winit::window::Window;

use crate::device::{FrameTarget, GpuDevice, WindowSurface};
use crate::error::EngineError;
use crate::registry::Resources;
use crate::time::FrameClock;

/// Registry names of the resources the engine creates.
pub mod names {
    pub const SHADER_MODULE: &str = "glyph shaders";
    pub const RENDER_PIPELINE: &str = "glyph quad";
    pub const COMPUTE_PIPELINE: &str = "glyph compute";
    pub const UNIFORM_BUFFER: &str = "frame uniforms";
    pub const GLYPH_TEXTURE: &str = "glyph atlas";
    pub const BIND_GROUP: &str = "frame bindings";
}

/// Externally supplied inputs, borrowed for the duration of construction.
#[derive(Debug, Clone, Copy)]
pub struct EngineAssets<'a> {
    /// WGSL source for every stage.
    pub shader_source: &'a str,

    /// Decoded 128x48 glyph atlas. Without it, only the uniform buffer is bound.
    pub glyph_atlas: Option<&'a GlyphImage>,
}

/// Owns the device handles, the frame target and all named GPU resources.
pub struct Engine<T: FrameTarget> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: T,

    /// Size written into the uniforms; follows the last `resize`.
    canvas_size: CanvasSize,

    clock: FrameClock,
    config: EngineConfig,
    resources: Resources,

    /// What the last submitted frame contained.
    last_frame: Option<FrameReport>,
}

impl<T: FrameTarget> Engine<T> {
    /// Builds every resource for `target`. Does not render.
    pub fn new(
        gpu: &GpuDevice,
        target: T,
        assets: EngineAssets<'_>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let device = gpu.device().clone();
        let queue = gpu.queue().clone();

        let mut resources = Resources::new();
        setup::build(
            &device,
            &queue,
            target.format(),
            &assets,
            &config,
            &mut resources,
        )?;

        let canvas_size = CanvasSize::from(target.size());
        log::info!(
            "engine ready: {}x{} {:?}, {:?}, glyph atlas {}",
            canvas_size.width,
            canvas_size.height,
            target.format(),
            config.draw_mode,
            if assets.glyph_atlas.is_some() { "bound" } else { "absent" },
        );

        Ok(Self {
            device,
            queue,
            target,
            canvas_size,
            clock: FrameClock::new(),
            config,
            resources,
            last_frame: None,
        })
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the named resources.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Record of the most recent submitted frame; `None` before the first one.
    pub fn last_frame(&self) -> Option<&FrameReport> {
        self.last_frame.as_ref()
    }

    /// Releases the texture registered under `name`. Returns `false` if absent.
    ///
    /// Destroying the glyph atlas also drops the frame bind group that views it, so later
    /// frames fail with [`EngineError::MissingResource`] instead of sampling a dead texture.
    pub fn destroy_texture(&mut self, name: &str) -> bool {
        if !self.resources.destroy_texture(name) {
            return false;
        }
        if name == names::GLYPH_TEXTURE {
            self.resources.destroy_bind_group(names::BIND_GROUP);
        }
        true
    }
}

impl<'w> Engine<WindowSurface<'w>> {
    /// Acquires a surface for `window` and builds the engine on it.
    ///
    /// Fails with [`EngineError::NoGpuSupport`] if the window cannot be presented to.
    pub fn for_window(
        gpu: &GpuDevice,
        window: &'w Window,
        assets: EngineAssets<'_>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let target = WindowSurface::new(gpu, window)?;
        Self::new(gpu, target, assets, config)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::device::create_test_gpu;
    use crate::registry::PipelineKind;

    #[test]
    fn construction_registers_every_resource() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let engine = quad_engine(&gpu, &atlas).unwrap();
        let resources = engine.resources();

        assert!(resources.shader(names::SHADER_MODULE).is_some());
        assert!(resources.render_pipeline(names::RENDER_PIPELINE).is_some());
        assert!(resources.compute_pipeline(names::COMPUTE_PIPELINE).is_none());
        assert!(resources.texture(names::GLYPH_TEXTURE).is_some());
        assert!(resources.bind_group(names::BIND_GROUP).is_some());
        assert_eq!(
            resources.buffer(names::UNIFORM_BUFFER).map(wgpu::Buffer::size),
            Some(16)
        );
        assert_eq!(engine.canvas_size(), CanvasSize::new(800, 600));
        assert!(engine.last_frame().is_none());
    }

    #[test]
    fn unknown_names_are_not_found_in_every_registry() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let engine = quad_engine(&gpu, &atlas).unwrap();
        let resources = engine.resources();

        assert!(resources.shader("nope").is_none());
        assert!(resources.pipeline("nope", PipelineKind::Render).is_none());
        assert!(resources.buffer("nope").is_none());
        assert!(resources.texture("nope").is_none());
        assert!(resources.bind_group("nope").is_none());
    }

    #[test]
    fn render_pipeline_is_not_a_compute_pipeline() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let engine = quad_engine(&gpu, &atlas).unwrap();
        let resources = engine.resources();

        assert!(resources
            .pipeline(names::RENDER_PIPELINE, PipelineKind::Render)
            .is_some());
        assert!(resources
            .pipeline(names::RENDER_PIPELINE, PipelineKind::Compute)
            .is_none());
        assert!(resources.compute_pipeline(names::RENDER_PIPELINE).is_none());
    }

    #[test]
    fn glyph_texture_matches_atlas() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let engine = quad_engine(&gpu, &atlas).unwrap();
        let texture = engine.resources().texture(names::GLYPH_TEXTURE).unwrap();

        assert_eq!(texture.width(), 128);
        assert_eq!(texture.height(), 48);
        assert_eq!(texture.format(), wgpu::TextureFormat::Rgba8Unorm);
        assert!(texture.usage().contains(
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT
        ));
    }

    #[test]
    fn wrong_atlas_size_fails_construction() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let small = GlyphImage::from_rgba8(64, 48, vec![0; 64 * 48 * 4]).unwrap();

        let result = quad_engine(&gpu, &small);
        assert!(matches!(
            result,
            Err(EngineError::AtlasSize {
                width: 64,
                height: 48,
                ..
            })
        ));
    }

    #[test]
    fn compute_entry_builds_a_compute_pipeline() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let engine = Engine::new(
            &gpu,
            offscreen(&gpu, 64, 64),
            EngineAssets {
                shader_source: TRIANGLE_SHADER,
                glyph_atlas: None,
            },
            EngineConfig {
                draw_mode: DrawMode::Triangle,
                vertex_entry: Some("vs_main".into()),
                fragment_entry: Some("fs_main".into()),
                compute_entry: Some("cs_main".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let resources = engine.resources();

        assert!(resources.compute_pipeline(names::COMPUTE_PIPELINE).is_some());
        assert!(resources
            .pipeline(names::COMPUTE_PIPELINE, PipelineKind::Render)
            .is_none());
        assert!(resources.texture(names::GLYPH_TEXTURE).is_none());
    }

    #[test]
    fn uploaded_atlas_is_flipped_on_the_gpu() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let mut engine = Engine::new(
            &gpu,
            offscreen(&gpu, 128, 2),
            EngineAssets {
                shader_source: ATLAS_ROWS_SHADER,
                glyph_atlas: Some(&atlas),
            },
            EngineConfig::default(),
        )
        .unwrap();

        engine.render().unwrap();
        let pixels = read_pixels(&gpu, engine.target());

        // Fixture texels are [x, source_row, 0, 255].
        for x in [0usize, 5, 127] {
            assert_eq!(pixels[x], [x as u8, 0, 0, 255], "texture row 47 at x={x}");
            assert_eq!(pixels[128 + x], [x as u8, 47, 0, 255], "texture row 0 at x={x}");
        }
    }

    #[test]
    fn destroying_the_atlas_drops_its_bind_group() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let mut engine = quad_engine(&gpu, &atlas).unwrap();

        assert!(engine.destroy_texture(names::GLYPH_TEXTURE));
        assert!(engine.resources().texture(names::GLYPH_TEXTURE).is_none());
        assert!(engine.resources().bind_group(names::BIND_GROUP).is_none());
        assert!(!engine.destroy_texture(names::GLYPH_TEXTURE));

        assert!(matches!(
            engine.render(),
            Err(EngineError::MissingResource {
                kind: "bind group",
                ..
            })
        ));
        assert!(engine.last_frame().is_none());
    }

    #[test]
    fn destroying_an_unknown_texture_keeps_the_bind_group() {
        let Some(gpu) = create_test_gpu() else {
            return;
        };
        let atlas = atlas();
        let mut engine = quad_engine(&gpu, &atlas).unwrap();

        assert!(!engine.destroy_texture("nope"));
        assert!(engine.resources().bind_group(names::BIND_GROUP).is_some());
        engine.render().unwrap();
    }
}
