//! Pixelation: block-average downsampling and nearest-neighbor upsampling.
//!
//! The two halves are used as a pair around color mapping, so the mapper
//! sees one sample per "point" and the result is blown back up to the
//! source resolution.

use crate::bitmap::Bitmap;

/// Average `point_size x point_size` blocks into single opaque pixels.
///
/// Output is `floor(width / point_size) x floor(height / point_size)`;
/// source pixels beyond those floored dimensions are dropped. Each channel
/// is the rounded arithmetic mean over the pixels the block covers.
///
/// Returns a clone of the input when `point_size <= 1`.
///
/// # Panics
///
/// Panics if the floored output would be empty. Callers check this via
/// [`coarse_dimensions`] before downsampling.
pub fn downsample(bitmap: &Bitmap, point_size: u32) -> Bitmap {
    if point_size <= 1 {
        return bitmap.clone();
    }

    let (out_w, out_h) = coarse_dimensions(bitmap.width(), bitmap.height(), point_size)
        .expect("point size exceeds bitmap dimensions");

    let mut data = Vec::with_capacity(out_w as usize * out_h as usize * 4);
    for by in 0..out_h {
        let y0 = by * point_size;
        let y1 = (y0 + point_size).min(bitmap.height());
        for bx in 0..out_w {
            let x0 = bx * point_size;
            let x1 = (x0 + point_size).min(bitmap.width());

            let mut sum = [0u64; 3];
            for y in y0..y1 {
                for x in x0..x1 {
                    let px = bitmap.pixel(x, y);
                    sum[0] += px[0] as u64;
                    sum[1] += px[1] as u64;
                    sum[2] += px[2] as u64;
                }
            }
            let count = ((x1 - x0) * (y1 - y0)) as u64;
            // Round half up
            data.extend_from_slice(&[
                ((sum[0] + count / 2) / count) as u8,
                ((sum[1] + count / 2) / count) as u8,
                ((sum[2] + count / 2) / count) as u8,
                255,
            ]);
        }
    }

    Bitmap::new(out_w, out_h, data).expect("coarse dimensions are non-zero")
}

/// Expand a coarse bitmap back to `width x height` by nearest neighbor.
///
/// Destination `(x, y)` copies coarse `(x / point_size, y / point_size)`,
/// clamped to the coarse bounds: the coarse grid was floor-divided and can
/// be short of the right/bottom edge. Alpha is forced to 255.
///
/// Returns a clone of the input when `point_size <= 1`.
pub fn upsample(coarse: &Bitmap, width: u32, height: u32, point_size: u32) -> Bitmap {
    if point_size <= 1 {
        return coarse.clone();
    }

    let max_x = coarse.width() - 1;
    let max_y = coarse.height() - 1;
    Bitmap::from_fn(width, height, |x, y| {
        let [r, g, b, _] = coarse.pixel((x / point_size).min(max_x), (y / point_size).min(max_y));
        [r, g, b, 255]
    })
    .expect("upsample target dimensions are non-zero")
}

/// Size of the coarse grid for a source of `width x height`.
///
/// `None` when the source is smaller than one point in either direction.
pub fn coarse_dimensions(width: u32, height: u32, point_size: u32) -> Option<(u32, u32)> {
    let point_size = point_size.max(1);
    let w = width / point_size;
    let h = height / point_size;
    (w > 0 && h > 0).then_some((w, h))
}
