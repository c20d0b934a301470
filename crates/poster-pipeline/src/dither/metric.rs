//! Nearest-color search with pipeline-dependent channel weights.

use crate::color::{REC601_WEIGHTS, REC709_WEIGHTS};
use crate::options::ColorPipeline;

/// Weighted squared Euclidean distance between two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceMetric {
    weights: [f32; 3],
}

impl DistanceMetric {
    /// Unweighted distance.
    pub const EUCLIDEAN: DistanceMetric = DistanceMetric {
        weights: [1.0, 1.0, 1.0],
    };

    /// Rec.709 luma-weighted distance.
    pub const REC709: DistanceMetric = DistanceMetric {
        weights: REC709_WEIGHTS,
    };

    /// Rec.601 luma-weighted distance.
    pub const REC601: DistanceMetric = DistanceMetric {
        weights: REC601_WEIGHTS,
    };

    pub fn for_pipeline(pipeline: ColorPipeline) -> Self {
        match pipeline {
            ColorPipeline::Linear => Self::EUCLIDEAN,
            ColorPipeline::Smooth => Self::REC709,
            ColorPipeline::Standard => Self::REC601,
        }
    }

    #[inline]
    pub fn distance(&self, a: [f32; 3], b: [f32; 3]) -> f32 {
        let dr = a[0] - b[0];
        let dg = a[1] - b[1];
        let db = a[2] - b[2];
        self.weights[0] * dr * dr + self.weights[1] * dg * dg + self.weights[2] * db * db
    }

    /// Index of the closest candidate.
    ///
    /// Ties resolve to the earliest candidate. `candidates` must not be empty.
    #[inline]
    pub fn nearest(&self, sample: [f32; 3], candidates: &[[f32; 3]]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;
        for (i, &candidate) in candidates.iter().enumerate() {
            let dist = self.distance(sample, candidate);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        best_idx
    }
}
