//! Construction-time resource creation, in dependency order:
//! shader → pipelines → buffers/textures → bind group.

use crate::error::EngineError;
use crate::registry::Resources;

use super::atlas::{GlyphImage, GLYPH_ATLAS_FORMAT, GLYPH_ATLAS_HEIGHT, GLYPH_ATLAS_WIDTH};
use super::config::EngineConfig;
use super::names;
use super::uniforms::FrameUniforms;
use super::EngineAssets;

pub(super) fn build(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    assets: &EngineAssets<'_>,
    config: &EngineConfig,
    resources: &mut Resources,
) -> Result<(), EngineError> {
    if let Some(atlas) = assets.glyph_atlas {
        atlas.ensure_atlas_size()?;
    }

    resources.compile_module(device, names::SHADER_MODULE, assets.shader_source);
    build_pipelines(device, surface_format, config, resources)?;
    allocate_uniforms(device, resources);

    if let Some(atlas) = assets.glyph_atlas {
        upload_glyph_atlas(device, queue, atlas, resources);
    }

    build_bind_group(device, resources)
}

fn build_pipelines(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    config: &EngineConfig,
    resources: &mut Resources,
) -> Result<(), EngineError> {
    let shader = resources
        .shader(names::SHADER_MODULE)
        .cloned()
        .ok_or_else(|| EngineError::missing("shader module", names::SHADER_MODULE))?;

    let targets = [Some(wgpu::ColorTargetState {
        format: surface_format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })];

    resources.create_render_pipeline(
        device,
        names::RENDER_PIPELINE,
        &wgpu::RenderPipelineDescriptor {
            label: None,
            // Auto layout: group 0 is derived from the shader's bindings.
            layout: None,

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: config.vertex_entry.as_deref(),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: config.fragment_entry.as_deref(),
                compilation_options: Default::default(),
                targets: &targets,
            }),

            primitive: wgpu::PrimitiveState {
                topology: config.draw_mode.topology(),
                ..Default::default()
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        },
    );

    if let Some(entry) = config.compute_entry.as_deref() {
        resources.create_compute_pipeline(
            device,
            names::COMPUTE_PIPELINE,
            &wgpu::ComputePipelineDescriptor {
                label: None,
                layout: None,
                module: &shader,
                entry_point: Some(entry),
                compilation_options: Default::default(),
                cache: None,
            },
        );
    }

    Ok(())
}

fn allocate_uniforms(device: &wgpu::Device, resources: &mut Resources) {
    resources.create_buffer(
        device,
        names::UNIFORM_BUFFER,
        &wgpu::BufferDescriptor {
            label: None,
            size: FrameUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        },
    );
}

fn upload_glyph_atlas(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    atlas: &GlyphImage,
    resources: &mut Resources,
) {
    let size = wgpu::Extent3d {
        width: GLYPH_ATLAS_WIDTH,
        height: GLYPH_ATLAS_HEIGHT,
        depth_or_array_layers: 1,
    };

    let texture = resources.create_texture(
        device,
        names::GLYPH_TEXTURE,
        &wgpu::TextureDescriptor {
            label: None,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: GLYPH_ATLAS_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        },
    );

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &atlas.flipped_rows(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(atlas.bytes_per_row()),
            rows_per_image: Some(GLYPH_ATLAS_HEIGHT),
        },
        size,
    );
}

/// Binding 0: uniform buffer. Binding 1: glyph atlas view, when an atlas was uploaded.
fn build_bind_group(device: &wgpu::Device, resources: &mut Resources) -> Result<(), EngineError> {
    let layout = resources
        .render_pipeline(names::RENDER_PIPELINE)
        .ok_or_else(|| EngineError::missing("render pipeline", names::RENDER_PIPELINE))?
        .get_bind_group_layout(0);

    let uniforms = resources
        .buffer(names::UNIFORM_BUFFER)
        .cloned()
        .ok_or_else(|| EngineError::missing("buffer", names::UNIFORM_BUFFER))?;

    let atlas_view = resources
        .texture(names::GLYPH_TEXTURE)
        .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()));

    let mut entries = vec![wgpu::BindGroupEntry {
        binding: 0,
        resource: uniforms.as_entire_binding(),
    }];
    if let Some(view) = atlas_view.as_ref() {
        entries.push(wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::TextureView(view),
        });
    }

    resources.create_bind_group(
        device,
        names::BIND_GROUP,
        &wgpu::BindGroupDescriptor {
            label: None,
            layout: &layout,
            entries: &entries,
        },
    );

    Ok(())
}
