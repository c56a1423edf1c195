mod assets;
mod cli;

use anyhow::Result;
use clap::Parser;
use glyphwave_engine::GpuInit;
use glyphwave_engine::logging::init_logging;
use glyphwave_engine::window::{Runtime, SceneSetup};

use crate::cli::CliArgs;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.logging_config());

    let scene = SceneSetup {
        shader_source: assets::load_shader(args.shader.as_deref())?,
        glyph_atlas: Some(assets::load_atlas(args.atlas.as_deref())?),
        engine: args.engine_config(),
    };

    log::info!(
        "starting glyphwave ({:?}, {})",
        scene.engine.draw_mode,
        if args.no_animate { "on demand" } else { "animated" }
    );

    Runtime::run(args.runtime_config(), GpuInit::default(), scene)
}
