use winit::dpi::PhysicalSize;

use crate::device::{FrameTarget, SurfaceErrorAction};
use crate::error::EngineError;
use crate::time::FrameTime;

use super::names;
use super::uniforms::{CanvasSize, FrameUniforms};
use super::Engine;

/// Summary of one submitted frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,

    /// Values written to the uniform buffer.
    pub uniforms: FrameUniforms,

    pub clear_color: wgpu::Color,

    /// Vertices issued by the frame's single draw.
    pub vertex_count: u32,

    pub canvas_size: CanvasSize,
}

impl<T: FrameTarget> Engine<T> {
    /// Renders and submits one frame.
    ///
    /// Submission is fire-and-forget: this never waits for the GPU. A zero-area canvas
    /// or a transient surface error skips the frame and returns `Ok`.
    pub fn render(&mut self) -> Result<(), EngineError> {
        if self.canvas_size.is_empty() {
            log::trace!(
                "skipping frame: canvas is {}x{}",
                self.canvas_size.width,
                self.canvas_size.height
            );
            return Ok(());
        }

        let pipeline = self
            .resources
            .render_pipeline(names::RENDER_PIPELINE)
            .ok_or_else(|| EngineError::missing("render pipeline", names::RENDER_PIPELINE))?;
        let bind_group = self
            .resources
            .bind_group(names::BIND_GROUP)
            .ok_or_else(|| EngineError::missing("bind group", names::BIND_GROUP))?;
        let uniform_buffer = self
            .resources
            .buffer(names::UNIFORM_BUFFER)
            .ok_or_else(|| EngineError::missing("buffer", names::UNIFORM_BUFFER))?;

        let time: FrameTime = self.clock.tick();
        let uniforms = FrameUniforms::new(self.canvas_size, time.elapsed);
        let payload = uniforms.payload();
        self.queue
            .write_buffer(uniform_buffer, 0, bytemuck::cast_slice(&payload));

        let frame = match self.target.acquire() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("failed to acquire frame {}: {err}", time.frame_index);
                return match self.target.recover(&self.device, err) {
                    SurfaceErrorAction::Fatal => Err(EngineError::SurfaceOutOfMemory),
                    action => {
                        log::debug!("frame {} skipped ({action:?})", time.frame_index);
                        Ok(())
                    }
                };
            }
        };

        let clear_color = self.config.clear_color();
        let vertex_count = self.config.draw_mode.vertex_count();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glyphwave frame encoder"),
            });

        // Pass borrows the encoder; dropped before `finish`.
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glyphwave frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.draw(0..vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.target.present(frame);

        let report = FrameReport {
            frame_index: time.frame_index,
            uniforms,
            clear_color,
            vertex_count,
            canvas_size: self.canvas_size,
        };
        log::trace!("submitted {report:?}");
        self.last_frame = Some(report);

        Ok(())
    }

    /// Applies a new drawable size and renders immediately.
    ///
    /// Nothing is reallocated: the next uniform write picks up the new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        log::debug!("resize to {width}x{height}");
        self.target
            .resize(&self.device, PhysicalSize::new(width, height));
        self.canvas_size = CanvasSize::new(width, height);
        self.render()
    }
}
