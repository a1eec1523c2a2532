//! PNG encoding for rendered canvases.
//!
//! Supports three encoding modes, picked per image:
//! - **Indexed PNG (color type 3)**: Used when the image has ≤256 unique colors.
//!   Text anti-aliasing on a four-colour theme rarely goes past that.
//! - **RGB PNG (color type 2)**: Fallback for opaque images with >256 colors.
//! - **RGBA PNG (color type 6)**: Only when some pixel is translucent.
//!
//! Use `encode_png` for automatic mode selection and `write_png` to put the
//! result on disk.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Pixel layout written to IDAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngColorType {
    Indexed,
    Rgb,
    Rgba,
}

impl PngColorType {
    fn code(self) -> u8 {
        match self {
            PngColorType::Indexed => 3,
            PngColorType::Rgb => 2,
            PngColorType::Rgba => 6,
        }
    }

    fn bytes_per_pixel(self) -> usize {
        match self {
            PngColorType::Indexed => 1,
            PngColorType::Rgb => 3,
            PngColorType::Rgba => 4,
        }
    }
}

/// Encode an image, choosing the most compact color type.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let pixels = image.as_raw();
    if let Some((palette, indices)) = extract_palette(pixels) {
        return create_png_indexed(width, height, &palette, &indices);
    }

    if pixels.chunks_exact(4).all(|p| p[3] == u8::MAX) {
        let rgb: Vec<u8> = pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();
        create_png(width, height, PngColorType::Rgb, &rgb)
    } else {
        create_png(width, height, PngColorType::Rgba, pixels)
    }
}

/// Encode an image and write it to `path`. Returns the number of bytes written.
pub fn write_png(image: &RgbaImage, path: &Path) -> RenderResult<usize> {
    let png = encode_png(image)?;
    std::fs::write(path, &png).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = png.len(), "Wrote PNG");
    Ok(png.len())
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(p: &[u8]) -> u32 {
    (p[0] as u32) | ((p[1] as u32) << 8) | ((p[2] as u32) << 16) | ((p[3] as u32) << 24)
}

/// Build a palette and per-pixel indices, or `None` past 256 colors.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = pack_color(chunk);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([chunk[0], chunk[1], chunk[2], chunk[3]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn write_header(png: &mut Vec<u8>, width: u32, height: u32, color_type: PngColorType) {
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&width.to_be_bytes());
    ihdr_data.extend_from_slice(&height.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type.code());
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(png, b"IHDR", &ihdr_data);
}

/// Create an indexed PNG (color type 3) from palette and indices.
fn create_png_indexed(
    width: u32,
    height: u32,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    let mut png = Vec::new();
    write_header(&mut png, width, height, PngColorType::Indexed);

    let plte_data: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS only if any entry is translucent
    if palette.iter().any(|c| c[3] < u8::MAX) {
        let trns_data: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_idat(indices, width, height, PngColorType::Indexed)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a truecolor PNG (color type 2 or 6).
fn create_png(
    width: u32,
    height: u32,
    color_type: PngColorType,
    data: &[u8],
) -> RenderResult<Vec<u8>> {
    let mut png = Vec::new();
    write_header(&mut png, width, height, color_type);

    let idat_data = deflate_idat(data, width, height, color_type)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate scanlines for the IDAT chunk.
fn deflate_idat(
    data: &[u8],
    width: u32,
    height: u32,
    color_type: PngColorType,
) -> RenderResult<Vec<u8>> {
    let stride = width as usize * color_type.bytes_per_pixel();
    let height = height as usize;
    if data.len() != stride * height {
        return Err(RenderError::Encode(format!(
            "expected {} bytes of pixel data, got {}",
            stride * height,
            data.len()
        )));
    }

    // Filter byte (0 = none) before each scanline
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in data.chunks_exact(stride) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&uncompressed)
        .and_then(|_| encoder.finish())
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn color_type_of(png: &[u8]) -> u8 {
        // signature (8) + length (4) + "IHDR" (4) + width (4) + height (4) + depth (1)
        png[25]
    }

    fn has_chunk(png: &[u8], name: &[u8; 4]) -> bool {
        png.windows(4).any(|w| w == name)
    }

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 0, 0, 255, // red again
        ];

        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], indices[3]);
    }

    #[test]
    fn test_extract_palette_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 0, 255])
            .collect();
        assert!(extract_palette(&pixels).is_none());
    }

    #[test]
    fn test_few_colors_encode_indexed() {
        let mut image = RgbaImage::from_pixel(16, 8, Rgba([255, 255, 255, 255]));
        image.put_pixel(3, 3, Rgba([220, 53, 69, 255]));

        let png = encode_png(&image).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert_eq!(color_type_of(&png), 3);
        assert!(has_chunk(&png, b"PLTE"));
        assert!(!has_chunk(&png, b"tRNS"));
    }

    #[test]
    fn test_many_opaque_colors_encode_rgb() {
        let image = RgbaImage::from_fn(32, 32, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 7, 255]));
        let png = encode_png(&image).unwrap();
        assert_eq!(color_type_of(&png), 2);
    }

    #[test]
    fn test_translucent_pixels_keep_alpha() {
        let image = RgbaImage::from_fn(32, 32, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 7, 128]));
        let png = encode_png(&image).unwrap();
        assert_eq!(color_type_of(&png), 6);
    }

    #[test]
    fn test_decodes_back_to_same_pixels() {
        let image = RgbaImage::from_fn(20, 10, |x, y| {
            if (x + y) % 3 == 0 {
                Rgba([52, 58, 64, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let png = encode_png(&image).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_write_png_to_missing_directory_fails() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let path = Path::new("/nonexistent-dir/for/sure/calendar.png");
        let err = write_png(&image, path).unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }));
    }
}
