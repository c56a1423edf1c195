use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::device::{GpuDevice, GpuInit, WindowSurface};
use crate::engine::{Engine, EngineAssets, EngineConfig, GlyphImage};
use crate::error::EngineError;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Redraw every frame. When off, frames are only drawn on resize or expose.
    pub continuous: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glyphwave".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            continuous: true,
        }
    }
}

/// Everything needed to build the engine once a window exists.
pub struct SceneSetup {
    pub shader_source: String,
    pub glyph_atlas: Option<GlyphImage>,
    pub engine: EngineConfig,
}

impl SceneSetup {
    fn assets(&self) -> EngineAssets<'_> {
        EngineAssets {
            shader_source: &self.shader_source,
            glyph_atlas: self.glyph_atlas.as_ref(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and renders the scene into it until the window closes.
    pub fn run(initial: RuntimeConfig, gpu_init: GpuInit, scene: SceneSetup) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, scene);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    engine: Engine<WindowSurface<'this>>,
}

struct AppState {
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    scene: SceneSetup,

    gpu: Option<GpuDevice>,
    entry: Option<WindowEntry>,

    /// First fatal error; reported from `Runtime::run` after the loop exits.
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, scene: SceneSetup) -> Self {
        Self {
            initial,
            gpu_init,
            scene,
            gpu: None,
            entry: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        self.entry = None;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.initial.title.clone())
            .with_inner_size(self.initial.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = &self.gpu_init;
        let gpu = &mut self.gpu;
        let scene = &self.scene;
        let entry = WindowEntryTryBuilder {
            window,
            engine_builder: |w| build_engine(gpu, gpu_init, w, scene),
        }
        .try_build()
        .context("failed to build the engine for the window")?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    /// Runs `op` on the engine; a failed frame is fatal.
    fn drive<F>(&mut self, event_loop: &ActiveEventLoop, op: F)
    where
        F: FnOnce(&mut Engine<WindowSurface<'_>>) -> Result<(), EngineError>,
    {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if let Err(err) = entry.with_engine_mut(|engine| op(engine)) {
            self.fail(event_loop, anyhow::Error::new(err).context("frame failed"));
        }
    }
}

/// Builds the engine for `window`, creating the device on first use.
///
/// The adapter is requested against the first window's surface.
fn build_engine<'w>(
    gpu: &mut Option<GpuDevice>,
    init: &GpuInit,
    window: &'w Window,
    scene: &SceneSetup,
) -> Result<Engine<WindowSurface<'w>>, EngineError> {
    if let Some(gpu) = gpu.as_ref() {
        return Engine::for_window(gpu, window, scene.assets(), scene.engine.clone());
    }

    let instance = GpuDevice::create_instance();
    let surface = WindowSurface::create_surface(&instance, window)?;
    let device = pollster::block_on(GpuDevice::with_instance(
        instance,
        init.clone(),
        Some(&surface),
    ))?;

    let gpu = gpu.insert(device);
    let target = WindowSurface::from_surface(gpu, window, surface)?;
    Engine::new(gpu, target, scene.assets(), scene.engine.clone())
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if !self.initial.continuous {
            return;
        }

        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let is_ours = self
            .entry
            .as_ref()
            .is_some_and(|entry| entry.with_window(|w| w.id()) == window_id);
        if !is_ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.drive(event_loop, |engine| engine.resize(size.width, size.height));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self
                    .entry
                    .as_ref()
                    .map(|entry| entry.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    self.drive(event_loop, |engine| engine.resize(size.width, size.height));
                }
            }

            WindowEvent::RedrawRequested => {
                self.drive(event_loop, |engine| engine.render());
            }

            _ => {}
        }
    }
}
