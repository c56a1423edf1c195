use super::pipeline::{Pipeline, PipelineKind, PipelineRegistry};
use super::store::Registry;

/// Every GPU object the engine creates, keyed by name.
///
/// Each `create_*` call allocates through the device, labels the object with its name
/// unless the descriptor already carries a label, and stores it.
#[derive(Default)]
pub struct Resources {
    shaders: Registry<wgpu::ShaderModule>,
    pipelines: PipelineRegistry,
    buffers: Registry<wgpu::Buffer>,
    textures: Registry<wgpu::Texture>,
    bind_groups: Registry<wgpu::BindGroup>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    // ── shaders ───────────────────────────────────────────────────────────

    /// Compiles WGSL source into a module stored under `name`.
    pub fn compile_module(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> &wgpu::ShaderModule {
        log::debug!("compiling shader module `{name}` ({} bytes)", source.len());
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        self.shaders.insert(name, module)
    }

    pub fn shader(&self, name: &str) -> Option<&wgpu::ShaderModule> {
        self.shaders.get(name)
    }

    // ── pipelines ─────────────────────────────────────────────────────────

    pub fn create_render_pipeline<'a>(
        &mut self,
        device: &wgpu::Device,
        name: &'a str,
        desc: &wgpu::RenderPipelineDescriptor<'a>,
    ) -> &Pipeline {
        let mut desc = desc.clone();
        desc.label = desc.label.or(Some(name));

        log::debug!("creating render pipeline `{name}`");
        let pipeline = device.create_render_pipeline(&desc);
        self.pipelines.insert(name, Pipeline::Render(pipeline))
    }

    pub fn create_compute_pipeline<'a>(
        &mut self,
        device: &wgpu::Device,
        name: &'a str,
        desc: &wgpu::ComputePipelineDescriptor<'a>,
    ) -> &Pipeline {
        let mut desc = desc.clone();
        desc.label = desc.label.or(Some(name));

        log::debug!("creating compute pipeline `{name}`");
        let pipeline = device.create_compute_pipeline(&desc);
        self.pipelines.insert(name, Pipeline::Compute(pipeline))
    }

    /// Kind-checked lookup: a pipeline of the other kind is reported as absent.
    pub fn pipeline(&self, name: &str, kind: PipelineKind) -> Option<&Pipeline> {
        self.pipelines.get(name, kind)
    }

    pub fn render_pipeline(&self, name: &str) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.render(name)
    }

    pub fn compute_pipeline(&self, name: &str) -> Option<&wgpu::ComputePipeline> {
        self.pipelines.compute(name)
    }

    // ── buffers ───────────────────────────────────────────────────────────

    pub fn create_buffer<'a>(
        &mut self,
        device: &wgpu::Device,
        name: &'a str,
        desc: &wgpu::BufferDescriptor<'a>,
    ) -> &wgpu::Buffer {
        let desc = wgpu::BufferDescriptor {
            label: desc.label.or(Some(name)),
            ..desc.clone()
        };

        log::debug!("creating buffer `{name}` ({} bytes, {:?})", desc.size, desc.usage);
        let buffer = device.create_buffer(&desc);
        self.buffers.insert(name, buffer)
    }

    pub fn buffer(&self, name: &str) -> Option<&wgpu::Buffer> {
        self.buffers.get(name)
    }

    // ── textures ──────────────────────────────────────────────────────────

    pub fn create_texture<'a>(
        &mut self,
        device: &wgpu::Device,
        name: &'a str,
        desc: &wgpu::TextureDescriptor<'a>,
    ) -> &wgpu::Texture {
        let desc = wgpu::TextureDescriptor {
            label: desc.label.or(Some(name)),
            ..desc.clone()
        };

        log::debug!(
            "creating texture `{name}` ({}x{} {:?})",
            desc.size.width,
            desc.size.height,
            desc.format
        );
        let texture = device.create_texture(&desc);
        self.textures.insert(name, texture)
    }

    pub fn texture(&self, name: &str) -> Option<&wgpu::Texture> {
        self.textures.get(name)
    }

    /// Releases the texture stored under `name`. Returns `false` (a no-op) if absent.
    ///
    /// Bind groups holding a view of the texture are not touched.
    pub fn destroy_texture(&mut self, name: &str) -> bool {
        self.textures.destroy(name)
    }

    // ── bind groups ───────────────────────────────────────────────────────

    pub fn create_bind_group<'a>(
        &mut self,
        device: &wgpu::Device,
        name: &'a str,
        desc: &wgpu::BindGroupDescriptor<'a>,
    ) -> &wgpu::BindGroup {
        let desc = wgpu::BindGroupDescriptor {
            label: desc.label.or(Some(name)),
            ..desc.clone()
        };

        log::debug!(
            "creating bind group `{name}` ({} entries)",
            desc.entries.len()
        );
        let bind_group = device.create_bind_group(&desc);
        self.bind_groups.insert(name, bind_group)
    }

    pub fn bind_group(&self, name: &str) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(name)
    }

    /// Drops the bind group stored under `name`. Returns `false` if absent.
    pub fn destroy_bind_group(&mut self, name: &str) -> bool {
        self.bind_groups.destroy(name)
    }
}
