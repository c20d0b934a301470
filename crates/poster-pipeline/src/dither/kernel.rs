//! Error diffusion kernel definition.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: a neighbor offset relative to the
/// current sample and the numerator of the share of error it receives.
/// `dx` is written for a left-to-right scan and is mirrored on right-to-left
/// rows; `dy` is always non-negative.
///
/// The total propagated share is `sum(weights) / divisor`.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the quantization error this kernel passes on.
    pub fn propagated_share(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Atkinson dithering kernel.
///
/// Distributes 1/8 of the error to each of 6 neighbors, 6/8 in total. The
/// remaining quarter is dropped on purpose; this is what keeps flat areas
/// flat on small palettes.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (2, 0, 1),  // two right
        (-1, 1, 1), // bottom-left
        (0, 1, 1),  // bottom
        (1, 1, 1),  // bottom-right
        (0, 2, 1),  // two below
    ],
    divisor: 8,
};
