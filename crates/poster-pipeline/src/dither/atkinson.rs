//! Atkinson error diffusion dithering algorithm.
//!
//! Atkinson dithering distributes only 75% of the quantization error (6/8),
//! which keeps flat regions clean on small palettes. Originally developed
//! by Bill Atkinson for the Apple Macintosh.

use super::kernel::{Kernel, ATKINSON};
use super::metric::DistanceMetric;
use super::{Quantize, WorkingBuffer};

/// Serpentine Atkinson error diffusion over nearest-color quantization.
///
/// Rows are visited top to bottom. Even rows (0-indexed) scan left to
/// right, odd rows right to left, and the kernel's horizontal offsets are
/// mirrored with the scan direction so error always lands on samples not
/// yet visited.
///
/// ```text
///   left -> right          right -> left
///        X   1   1          1   1   X
///    1   1   1                  1   1   1
///        1                          1
/// ```
///
/// Offsets falling outside the image are dropped without redistribution.
///
/// # Example
///
/// ```
/// use poster_pipeline::dither::{Atkinson, DistanceMetric, Quantize, WorkingBuffer, WorkingSpace};
/// use poster_pipeline::Bitmap;
///
/// let bitmap = Bitmap::filled(4, 4, [128, 128, 128, 255]).unwrap();
/// let mut buffer = WorkingBuffer::from_bitmap(&bitmap, WorkingSpace::Encoded);
/// Atkinson::new(DistanceMetric::REC601).quantize(&mut buffer, &[[0.0; 3], [255.0; 3]]);
///
/// let out = buffer.into_bitmap();
/// assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Atkinson {
    metric: DistanceMetric,
    kernel: Kernel,
}

impl Atkinson {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            kernel: ATKINSON,
        }
    }
}

impl Quantize for Atkinson {
    fn quantize(&self, buffer: &mut WorkingBuffer, palette: &[[f32; 3]]) {
        let width = buffer.width();
        let height = buffer.height();
        let share = 1.0 / self.kernel.divisor as f32;

        for y in 0..height {
            let dir: i64 = if y % 2 == 0 { 1 } else { -1 };

            for step in 0..width {
                let x = if dir > 0 { step } else { width - 1 - step };

                let old = buffer.get(x, y);
                let chosen = palette[self.metric.nearest(old, palette)];
                buffer.set(x, y, chosen);

                let error = [old[0] - chosen[0], old[1] - chosen[1], old[2] - chosen[2]];
                if error == [0.0; 3] {
                    continue;
                }

                for &(dx, dy, weight) in self.kernel.entries {
                    let nx = x as i64 + dx as i64 * dir;
                    let ny = y + dy as usize;
                    if nx < 0 || nx >= width as i64 || ny >= height {
                        continue;
                    }
                    buffer.add(nx as usize, ny, error, share * weight as f32);
                }
            }
        }
    }
}
