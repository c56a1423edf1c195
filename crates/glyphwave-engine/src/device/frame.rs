/// A single acquired frame image.
///
/// This object is short-lived and must be presented promptly. Holding a surface
/// texture prevents acquisition of subsequent frames.
pub struct AcquiredFrame {
    /// Color view the render pass draws into.
    pub view: wgpu::TextureView,

    /// Swapchain image backing `view`; `None` for offscreen targets.
    pub surface_texture: Option<wgpu::SurfaceTexture>,
}

impl AcquiredFrame {
    /// Presents the swapchain image, if any. Must be called after submission.
    pub fn present(self) {
        let AcquiredFrame {
            view,
            surface_texture,
        } = self;
        drop(view);
        if let Some(surface_texture) = surface_texture {
            surface_texture.present();
        }
    }
}
