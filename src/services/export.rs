//! Export surface: encode processed bitmaps as PNG or JPEG.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use poster_pipeline::Bitmap;

use crate::error::ExportError;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg { quality: u8 },
}

impl ExportFormat {
    /// JPEG with a validated quality.
    pub fn jpeg(quality: u8) -> Result<Self, ExportError> {
        if !(1..=100).contains(&quality) {
            return Err(ExportError::Quality(quality));
        }
        Ok(ExportFormat::Jpeg { quality })
    }

    /// Pick the format from an output file extension.
    pub fn from_path(path: &Path, quality: u8) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Self::jpeg(quality),
            _ => Err(ExportError::UnknownExtension(ext)),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn encode(self, bitmap: &Bitmap) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Png => encode_png(bitmap),
            ExportFormat::Jpeg { quality } => encode_jpeg(bitmap, quality),
        }
    }
}

/// Encode as PNG, indexed when the bitmap has at most 256 colors.
///
/// Pipeline output is opaque, so alpha is not written.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, ExportError> {
    let (color_type, bit_depth, plte, data) = match index_colors(bitmap) {
        Some((palette, indices)) => {
            let (depth, bits) = match palette.len() {
                0..=2 => (png::BitDepth::One, 1),
                3..=4 => (png::BitDepth::Two, 2),
                5..=16 => (png::BitDepth::Four, 4),
                _ => (png::BitDepth::Eight, 8),
            };
            let plte: Vec<u8> = palette.iter().flatten().copied().collect();
            let packed = if bits == 8 {
                indices
            } else {
                pack_nbits(&indices, bitmap.width(), bits)
            };
            (png::ColorType::Indexed, depth, Some(plte), packed)
        }
        None => {
            let rgb: Vec<u8> = bitmap.pixels().flat_map(|[r, g, b, _]| [r, g, b]).collect();
            (png::ColorType::Rgb, png::BitDepth::Eight, None, rgb)
        }
    };

    // Fast settings; oxipng re-compresses afterwards
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, bitmap.width(), bitmap.height());
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte.as_deref() {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or_else(|e| {
        tracing::warn!(%e, "oxipng failed, keeping unoptimized PNG");
        png_bytes
    });
    Ok(optimized)
}

/// Encode as baseline RGB JPEG.
pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, ExportError> {
    if !(1..=100).contains(&quality) {
        return Err(ExportError::Quality(quality));
    }
    let rgb: Vec<u8> = bitmap.pixels().flat_map(|[r, g, b, _]| [r, g, b]).collect();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(
            &rgb,
            bitmap.width(),
            bitmap.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ExportError::JpegEncode(e.to_string()))?;
    Ok(buf)
}

/// Palette and per-pixel indices, or `None` past 256 distinct colors.
fn index_colors(bitmap: &Bitmap) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut palette: Vec<[u8; 3]> = Vec::new();
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut indices = Vec::with_capacity(bitmap.pixel_count());

    for [r, g, b, _] in bitmap.pixels() {
        let key = [r, g, b];
        let idx = match lookup.get(&key) {
            Some(&idx) => idx,
            None => {
                if palette.len() == 256 {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(key);
                lookup.insert(key, idx);
                idx
            }
        };
        indices.push(idx);
    }

    Some((palette, indices))
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> image::RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    fn three_color(width: u32, height: u32) -> Bitmap {
        Bitmap::from_fn(width, height, |x, y| match (x + 2 * y) % 3 {
            0 => [0, 0, 0, 255],
            1 => [255, 0, 0, 255],
            _ => [255, 255, 255, 255],
        })
        .unwrap()
    }

    #[test]
    fn test_pack_nbits() {
        // 2-bit, 5 pixels -> 2 bytes per row, last byte padded
        let packed = pack_nbits(&[1, 2, 3, 0, 1], 5, 2);
        assert_eq!(packed, vec![0b01_10_11_00, 0b01_00_00_00]);

        // 1-bit rows are packed independently
        let packed = pack_nbits(&[1, 0, 1, 1, 1, 0], 3, 1);
        assert_eq!(packed, vec![0b1010_0000, 0b1100_0000]);
    }

    #[test]
    fn test_index_colors_limit() {
        let few = three_color(5, 4);
        let (palette, indices) = index_colors(&few).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices.len(), 20);

        let many = Bitmap::from_fn(32, 9, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
        assert!(index_colors(&many).is_none());
    }

    #[test]
    fn test_png_round_trip_indexed() {
        let bitmap = three_color(7, 5);
        let bytes = encode_png(&bitmap).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = decode(&bytes);
        assert_eq!(decoded.dimensions(), (7, 5));
        assert_eq!(decoded.into_raw(), bitmap.into_raw());
    }

    #[test]
    fn test_png_round_trip_truecolor() {
        let bitmap = Bitmap::from_fn(40, 10, |x, y| [x as u8 * 6, y as u8 * 20, 99, 255]).unwrap();
        let decoded = decode(&encode_png(&bitmap).unwrap());
        assert_eq!(decoded.into_raw(), bitmap.into_raw());
    }

    #[test]
    fn test_jpeg_encodes() {
        let bitmap = three_color(16, 16);
        let bytes = encode_jpeg(&bitmap, 85).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(decode(&bytes).dimensions(), (16, 16));
    }

    #[test]
    fn test_jpeg_quality_validated() {
        assert!(matches!(ExportFormat::jpeg(0), Err(ExportError::Quality(0))));
        assert!(matches!(ExportFormat::jpeg(101), Err(ExportError::Quality(101))));
        assert_eq!(
            ExportFormat::jpeg(100).unwrap(),
            ExportFormat::Jpeg { quality: 100 }
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/poster.PNG"), 90).unwrap(),
            ExportFormat::Png
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("poster.jpeg"), 70).unwrap(),
            ExportFormat::Jpeg { quality: 70 }
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("poster.tiff"), 90),
            Err(ExportError::UnknownExtension(_))
        ));
        assert_eq!(ExportFormat::Png.content_type(), "image/png");
    }
}
