use crate::error::EngineError;

use super::GpuInit;

/// Owns the wgpu instance, adapter, device and queue.
///
/// This is the "ready device" the engine is built on. It carries no surface: window
/// surfaces are acquired per target from [`GpuDevice::instance`], so the same device can
/// drive a window or an offscreen texture.
pub struct GpuDevice {
    /// wgpu instance used to create the adapter and any surfaces.
    instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Parameters the device was created with; surfaces read their options from here.
    init: GpuInit,
}

impl GpuDevice {
    /// Requests an adapter and a logical device.
    ///
    /// `compatible_surface` narrows adapter selection to one that can present to it.
    pub async fn new(
        init: GpuInit,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, EngineError> {
        Self::with_instance(Self::create_instance(), init, compatible_surface).await
    }

    /// Instance over all backends, letting wgpu pick the platform's best one.
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Like [`GpuDevice::new`] but reuses an existing instance.
    ///
    /// Pass the window's surface as `compatible_surface` so the adapter can present to it.
    pub async fn with_instance(
        instance: wgpu::Instance,
        init: GpuInit,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, EngineError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!(
            "using adapter `{}` ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("glyphwave device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            init,
        })
    }

    /// Blocking variant of [`GpuDevice::new`] without a surface hint.
    pub fn headless(init: GpuInit) -> Result<Self, EngineError> {
        pollster::block_on(Self::new(init, None))
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn init(&self) -> &GpuInit {
        &self.init
    }
}

/// Creates a headless device for tests. Returns `None` if no adapter is available.
#[cfg(test)]
pub(crate) fn create_test_gpu() -> Option<GpuDevice> {
    let init = GpuInit {
        power_preference: wgpu::PowerPreference::default(),
        ..GpuInit::default()
    };

    GpuDevice::headless(init).ok()
}
