/// How the full-screen geometry is drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DrawMode {
    /// One triangle, three vertices, triangle-list topology.
    Triangle,
    /// A full-screen quad: four vertices as a triangle strip.
    #[default]
    Quad,
}

impl DrawMode {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            DrawMode::Triangle => wgpu::PrimitiveTopology::TriangleList,
            DrawMode::Quad => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }

    pub fn vertex_count(self) -> u32 {
        match self {
            DrawMode::Triangle => 3,
            DrawMode::Quad => 4,
        }
    }

    /// Clear color used when [`EngineConfig::clear_color`] is unset.
    pub fn default_clear(self) -> wgpu::Color {
        match self {
            DrawMode::Triangle => wgpu::Color::BLUE,
            DrawMode::Quad => wgpu::Color::TRANSPARENT,
        }
    }
}

/// Engine construction options.
///
/// Entry points left as `None` let wgpu pick the module's only entry point for that
/// stage.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub draw_mode: DrawMode,

    /// Overrides the draw mode's clear color.
    pub clear_color: Option<wgpu::Color>,

    pub vertex_entry: Option<String>,
    pub fragment_entry: Option<String>,

    /// Builds an extra compute pipeline from the same module. It is never dispatched by
    /// the render loop.
    pub compute_entry: Option<String>,
}

impl EngineConfig {
    /// Effective clear color for the frame pass.
    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
            .unwrap_or_else(|| self.draw_mode.default_clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_a_four_vertex_strip() {
        assert_eq!(DrawMode::Quad.vertex_count(), 4);
        assert_eq!(
            DrawMode::Quad.topology(),
            wgpu::PrimitiveTopology::TriangleStrip
        );
    }

    #[test]
    fn triangle_is_a_three_vertex_list() {
        assert_eq!(DrawMode::Triangle.vertex_count(), 3);
        assert_eq!(
            DrawMode::Triangle.topology(),
            wgpu::PrimitiveTopology::TriangleList
        );
    }

    #[test]
    fn default_config_draws_a_quad_cleared_transparent() {
        let config = EngineConfig::default();
        assert_eq!(config.draw_mode, DrawMode::Quad);
        assert_eq!(config.clear_color(), wgpu::Color::TRANSPARENT);
    }

    #[test]
    fn triangle_mode_clears_blue() {
        let config = EngineConfig {
            draw_mode: DrawMode::Triangle,
            ..Default::default()
        };
        assert_eq!(config.clear_color(), wgpu::Color::BLUE);
    }

    #[test]
    fn explicit_clear_wins() {
        let config = EngineConfig {
            draw_mode: DrawMode::Triangle,
            clear_color: Some(wgpu::Color::RED),
            ..Default::default()
        };
        assert_eq!(config.clear_color(), wgpu::Color::RED);
    }
}
