use crate::error::EngineError;

/// Glyph atlas dimensions the shader is written against.
pub const GLYPH_ATLAS_WIDTH: u32 = 128;
pub const GLYPH_ATLAS_HEIGHT: u32 = 48;

/// Texel format of the glyph atlas texture.
pub const GLYPH_ATLAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BYTES_PER_PIXEL: usize = 4;

/// A decoded RGBA8 image, rows top to bottom.
///
/// The engine borrows it during construction and copies it into the glyph texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GlyphImage {
    /// Wraps tightly packed RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(EngineError::AtlasData {
                actual: pixels.len(),
                expected,
                width,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * BYTES_PER_PIXEL as u32
    }

    /// RGBA value at `(x, y)`, `y` counted from the top row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.pixels.get(at..at + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixel rows in reverse order: source row 0 becomes the last row.
    ///
    /// This is the layout uploaded to the glyph texture.
    pub fn flipped_rows(&self) -> Vec<u8> {
        let row = self.bytes_per_row() as usize;
        if row == 0 {
            return Vec::new();
        }
        self.pixels
            .chunks_exact(row)
            .rev()
            .flatten()
            .copied()
            .collect()
    }

    /// Checks the image against the fixed atlas dimensions.
    pub fn ensure_atlas_size(&self) -> Result<(), EngineError> {
        if self.width == GLYPH_ATLAS_WIDTH && self.height == GLYPH_ATLAS_HEIGHT {
            return Ok(());
        }
        Err(EngineError::AtlasSize {
            width: self.width,
            height: self.height,
            expected_width: GLYPH_ATLAS_WIDTH,
            expected_height: GLYPH_ATLAS_HEIGHT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Image whose red channel holds the row index.
    fn row_tagged(width: u32, height: u32) -> GlyphImage {
        let mut pixels = Vec::new();
        for y in 0..height {
            for _ in 0..width {
                pixels.extend_from_slice(&[y as u8, 0, 0, 255]);
            }
        }
        GlyphImage::from_rgba8(width, height, pixels).unwrap()
    }

    #[test]
    fn rejects_short_pixel_data() {
        let err = GlyphImage::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::AtlasData {
                actual: 15,
                expected: 16,
                ..
            }
        ));
    }

    #[test]
    fn flip_moves_first_row_to_bottom() {
        let image = row_tagged(GLYPH_ATLAS_WIDTH, GLYPH_ATLAS_HEIGHT);
        let flipped = image.flipped_rows();
        let row = image.bytes_per_row() as usize;

        assert_eq!(flipped.len(), image.pixels().len());
        // Texture row 0 holds source row 47, texture row 47 holds source row 0.
        assert_eq!(flipped[0], 47);
        assert_eq!(flipped[row * 47], 0);
        for texture_row in 0..GLYPH_ATLAS_HEIGHT as usize {
            assert_eq!(flipped[texture_row * row], (47 - texture_row) as u8);
        }
    }

    #[test]
    fn flip_keeps_pixels_within_a_row() {
        let pixels: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8).collect();
        let image = GlyphImage::from_rgba8(2, 2, pixels).unwrap();
        assert_eq!(
            image.flipped_rows(),
            vec![8, 9, 10, 11, 12, 13, 14, 15, 0, 1, 2, 3, 4, 5, 6, 7]
        );
    }

    #[test]
    fn flip_of_empty_image_is_empty() {
        let image = GlyphImage::from_rgba8(0, 0, Vec::new()).unwrap();
        assert!(image.flipped_rows().is_empty());
    }

    #[test]
    fn atlas_size_is_enforced() {
        assert!(row_tagged(GLYPH_ATLAS_WIDTH, GLYPH_ATLAS_HEIGHT)
            .ensure_atlas_size()
            .is_ok());
        assert!(matches!(
            row_tagged(64, 48).ensure_atlas_size(),
            Err(EngineError::AtlasSize { width: 64, height: 48, .. })
        ));
    }

    #[test]
    fn pixel_reads_top_down() {
        let image = row_tagged(4, 3);
        assert_eq!(image.pixel(0, 2), Some([2, 0, 0, 255]));
        assert_eq!(image.pixel(4, 0), None);
    }
}
