//! Command-line argument parsing for the studio.

use std::path::PathBuf;

use clap::Parser;
use glyphwave_engine::logging::LoggingConfig;
use glyphwave_engine::window::RuntimeConfig;
use glyphwave_engine::{DrawMode, EngineConfig};
use winit::dpi::LogicalSize;

/// Glyphwave studio command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "glyphwave", about = "Full-screen ASCII-art shader viewer")]
pub struct CliArgs {
    /// WGSL shader file. Defaults to the bundled ASCII effect.
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// 128x48 RGBA glyph atlas (PNG). Defaults to the built-in atlas.
    #[arg(long)]
    pub atlas: Option<PathBuf>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Draw a single triangle instead of the full-screen quad.
    #[arg(long)]
    pub triangle: bool,

    /// Also build a compute pipeline from this entry point.
    #[arg(long)]
    pub compute_entry: Option<String>,

    /// Clear color as "r,g,b,a" in 0..1.
    #[arg(long, value_parser = parse_color)]
    pub clear: Option<wgpu::Color>,

    /// Log filter (error, warn, info, debug, trace, or env_logger syntax).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Only redraw on resize/expose.
    #[arg(long)]
    pub no_animate: bool,
}

impl CliArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            draw_mode: if self.triangle {
                DrawMode::Triangle
            } else {
                DrawMode::Quad
            },
            clear_color: self.clear,
            compute_entry: self.compute_entry.clone(),
            ..Default::default()
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            initial_size: LogicalSize::new(f64::from(self.width), f64::from(self.height)),
            continuous: !self.no_animate,
            ..Default::default()
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_level.clone(),
            ..Default::default()
        }
    }
}

fn parse_color(s: &str) -> Result<wgpu::Color, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        &[r, g, b, a] => Ok(wgpu::Color { r, g, b, a }),
        &[r, g, b] => Ok(wgpu::Color { r, g, b, a: 1.0 }),
        _ => Err(format!("expected 3 or 4 components, got {}", parts.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_draw_an_animated_quad() {
        let args = CliArgs::try_parse_from(["glyphwave"]).unwrap();

        let engine = args.engine_config();
        assert_eq!(engine.draw_mode, DrawMode::Quad);
        assert!(engine.clear_color.is_none());
        assert!(engine.compute_entry.is_none());

        let runtime = args.runtime_config();
        assert!(runtime.continuous);
        assert_eq!(runtime.initial_size, LogicalSize::new(800.0, 600.0));
    }

    #[test]
    fn flags_override_engine_and_runtime() {
        let args = CliArgs::try_parse_from([
            "glyphwave",
            "--triangle",
            "--width",
            "320",
            "--height",
            "200",
            "--compute-entry",
            "cs_main",
            "--clear",
            "0.1, 0.2, 0.3",
            "--log-level",
            "debug",
            "--no-animate",
        ])
        .unwrap();

        let engine = args.engine_config();
        assert_eq!(engine.draw_mode, DrawMode::Triangle);
        assert_eq!(engine.compute_entry.as_deref(), Some("cs_main"));
        assert_eq!(
            engine.clear_color(),
            wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0
            }
        );

        let runtime = args.runtime_config();
        assert!(!runtime.continuous);
        assert_eq!(runtime.initial_size, LogicalSize::new(320.0, 200.0));

        assert_eq!(args.logging_config().env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_clear_color_is_rejected() {
        assert!(CliArgs::try_parse_from(["glyphwave", "--clear", "1,0"]).is_err());
        assert!(CliArgs::try_parse_from(["glyphwave", "--clear", "red"]).is_err());
    }
}
