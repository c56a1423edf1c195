//! Shader and glyph atlas loading.

use std::path::Path;

use anyhow::{Context, Result};
use glyphwave_engine::GlyphImage;
use glyphwave_engine::engine::{GLYPH_ATLAS_HEIGHT, GLYPH_ATLAS_WIDTH};

const BUNDLED_SHADER: &str = include_str!("../assets/ascii.wgsl");

/// Glyph cell edge in pixels.
const CELL: u32 = 8;
/// Cells per atlas row.
const COLUMNS: u32 = GLYPH_ATLAS_WIDTH / CELL;
/// First glyph in the atlas (space).
const FIRST_CODE: u8 = 32;

/// Density ramp drawn into the built-in atlas, darkest first. Rows top to bottom,
/// bit 7 is the leftmost pixel.
const RAMP_GLYPHS: [(char, [u8; 8]); 10] = [
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00]),
    (':', [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00]),
    ('-', [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00]),
    ('=', [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00]),
    ('+', [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00]),
    ('*', [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00]),
    ('#', [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00]),
    ('%', [0x00, 0xC6, 0xCC, 0x18, 0x30, 0x66, 0xC6, 0x00]),
    ('@', [0x7C, 0xC6, 0xDE, 0xDE, 0xDE, 0xC0, 0x78, 0x00]),
];

pub fn load_shader(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            log::info!("loading shader {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read shader {}", path.display()))
        }
        None => Ok(BUNDLED_SHADER.to_string()),
    }
}

/// Decodes `path` as RGBA8, or builds the built-in atlas.
pub fn load_atlas(path: Option<&Path>) -> Result<GlyphImage> {
    let Some(path) = path else {
        return builtin_atlas();
    };

    log::info!("loading glyph atlas {}", path.display());
    let img = image::open(path)
        .with_context(|| format!("failed to decode glyph atlas {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    let atlas = GlyphImage::from_rgba8(width, height, img.into_raw())?;
    atlas
        .ensure_atlas_size()
        .with_context(|| format!("unusable glyph atlas {}", path.display()))?;
    Ok(atlas)
}

/// 16x6 grid of 8x8 cells for codes 32..128. Only the ramp glyphs have ink.
pub fn builtin_atlas() -> Result<GlyphImage> {
    let width = GLYPH_ATLAS_WIDTH as usize;
    let mut pixels = vec![0u8; width * GLYPH_ATLAS_HEIGHT as usize * 4];

    for (ch, rows) in RAMP_GLYPHS {
        let (origin_x, origin_y) = cell_origin(ch);

        for (dy, bits) in rows.iter().enumerate() {
            for dx in 0..CELL as usize {
                if bits & (0x80u8 >> dx) == 0 {
                    continue;
                }
                let x = origin_x as usize + dx;
                let y = origin_y as usize + dy;
                let i = (y * width + x) * 4;
                pixels[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }

    Ok(GlyphImage::from_rgba8(
        GLYPH_ATLAS_WIDTH,
        GLYPH_ATLAS_HEIGHT,
        pixels,
    )?)
}

/// Top-left pixel of `ch`'s cell, in image (top-down) coordinates.
fn cell_origin(ch: char) -> (u32, u32) {
    let index = u32::from(ch) - u32::from(FIRST_CODE);
    ((index % COLUMNS) * CELL, (index / COLUMNS) * CELL)
}
