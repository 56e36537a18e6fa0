//! Recursive quad-tree region segmentation.
//!
//! The image is split depth-first into quadrants until each region is
//! homogeneous; every leaf is then painted with its rounded mean intensity,
//! giving a posterized map of the same size as the input.
//!
//! Algorithm
//! - For a region R compute mean and population standard deviation.
//! - R is a leaf if `std(R) < uniformity_threshold`, if
//!   `height(R) <= min_region_size`, or if R is a single row or a single
//!   column (such regions are never subdivided).
//! - Otherwise bisect height and width with integer division; the bottom and
//!   right quadrants take the odd row/column. Recurse into TL, TR, BL, BR.
//! - The four quadrants tile R exactly, so leaves cover every pixel once.
//!
//! Termination
//! - Height at depth `d` is at most `ceil(H / 2^d)`, and any region no
//!   taller than `min_region_size` stops, so the depth never exceeds
//!   `ceil(log2(H / min_region_size))`.
//!
//! Merge
//! - Split-only by default: adjacent leaves of different parents are never
//!   coalesced, even when their means are equal. Setting
//!   `merge_threshold` runs the opt-in pass in [`merge`].
//!
//! The split phase records an explicit arena tree ([`QuadTree`]) so the leaf
//! decomposition can be inspected after the fact.
pub mod merge;
mod region;
mod tree;

pub use merge::{merge_leaves, MergedSegmentation};
pub use region::{Region, RegionStats};
pub use tree::{NodeId, QuadNode, QuadTree};

use crate::diagnostics::elapsed_ms;
use crate::image::GrayImageU8;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Knobs for [`segment`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeParams {
    /// Regions no taller than this become leaves (>= 1).
    pub min_region_size: usize,
    /// Standard-deviation cutoff below which a region is uniform.
    pub uniformity_threshold: f32,
    /// When set, adjacent leaves whose means differ by at most this much are
    /// merged after the split phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_threshold: Option<f32>,
}

impl Default for QuadTreeParams {
    fn default() -> Self {
        Self {
            min_region_size: 4,
            uniformity_threshold: 10.0,
            merge_threshold: None,
        }
    }
}

impl QuadTreeParams {
    pub fn new(min_region_size: usize, uniformity_threshold: f32) -> Self {
        Self {
            min_region_size,
            uniformity_threshold,
            merge_threshold: None,
        }
    }

    pub fn with_merge_threshold(mut self, threshold: f32) -> Self {
        self.merge_threshold = Some(threshold);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_region_size < 1 {
            return Err(Error::invalid("min_region_size must be at least 1"));
        }
        if !self.uniformity_threshold.is_finite() || self.uniformity_threshold < 0.0 {
            return Err(Error::invalid(format!(
                "uniformity_threshold must be finite and non-negative, got {}",
                self.uniformity_threshold
            )));
        }
        if let Some(t) = self.merge_threshold {
            if !t.is_finite() || t < 0.0 {
                return Err(Error::invalid(format!(
                    "merge_threshold must be finite and non-negative, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// Segment `image` and return the flattened map.
pub fn segment(image: &GrayImageU8, params: &QuadTreeParams) -> Result<GrayImageU8> {
    Ok(segment_detailed(image, params)?.image)
}

/// Segmentation output plus the decomposition that produced it.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub image: GrayImageU8,
    pub tree: QuadTree,
    /// Regions after the optional merge pass (equals the leaf count when
    /// merging is off).
    pub region_count: usize,
    pub elapsed_ms: f64,
}

impl Segmentation {
    pub fn summary(&self) -> SegmentationSummary {
        SegmentationSummary {
            width: self.image.width(),
            height: self.image.height(),
            node_count: self.tree.nodes().len(),
            leaf_count: self.tree.leaf_count(),
            region_count: self.region_count,
            max_depth: self.tree.max_depth(),
            elapsed_ms: self.elapsed_ms,
            leaves: self
                .tree
                .leaves()
                .map(|(_, leaf)| LeafReport {
                    region: leaf.region,
                    depth: leaf.depth,
                    value: leaf.stats.fill_value(),
                    std: leaf.stats.std,
                })
                .collect(),
        }
    }
}

/// Serializable description of a segmentation, written by the tools.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationSummary {
    pub width: usize,
    pub height: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub region_count: usize,
    pub max_depth: usize,
    pub elapsed_ms: f64,
    pub leaves: Vec<LeafReport>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafReport {
    pub region: Region,
    pub depth: usize,
    pub value: u8,
    pub std: f64,
}

pub fn segment_detailed(image: &GrayImageU8, params: &QuadTreeParams) -> Result<Segmentation> {
    let start = Instant::now();
    let tree = QuadTree::build(image, params)?;
    let (image, region_count) = match params.merge_threshold {
        None => (tree.render(), tree.leaf_count()),
        Some(threshold) => {
            let merged = merge_leaves(&tree, threshold);
            (merged.image, merged.region_count)
        }
    };
    Ok(Segmentation {
        image,
        tree,
        region_count,
        elapsed_ms: elapsed_ms(start),
    })
}

/// Upper bound on split depth for an image of height `height`.
pub fn depth_bound(height: usize, min_region_size: usize) -> usize {
    if height <= min_region_size {
        return 0;
    }
    let ratio = height as f64 / min_region_size as f64;
    ratio.log2().ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_params() {
        let img = GrayImageU8::filled(8, 8, 1);
        for params in [
            QuadTreeParams::new(0, 5.0),
            QuadTreeParams::new(4, -1.0),
            QuadTreeParams::new(4, f32::NAN),
            QuadTreeParams::new(4, 5.0).with_merge_threshold(f32::INFINITY),
        ] {
            let err = segment(&img, &params).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{params:?}");
        }
    }

    #[test]
    fn rejects_empty_image() {
        for (w, h) in [(0, 8), (8, 0), (0, 0)] {
            let img = GrayImageU8::new(w, h);
            let err = segment(&img, &QuadTreeParams::default()).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[test]
    fn depth_bound_values() {
        assert_eq!(depth_bound(4, 4), 0);
        assert_eq!(depth_bound(16, 4), 2);
        assert_eq!(depth_bound(9, 4), 2);
        assert_eq!(depth_bound(17, 4), 3);
        assert_eq!(depth_bound(512, 1), 9);
    }

    #[test]
    fn leaf_value_rounds_to_nearest() {
        // Two rows: one at 10, one at 11 → mean 10.5 → 11.
        let img = GrayImageU8::from_fn(4, 2, |_, y| 10 + y as u8);
        let out = segment(&img, &QuadTreeParams::new(4, 10.0)).unwrap();
        assert!(out.pixels().iter().all(|&v| v == 11));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: QuadTreeParams = serde_json::from_str(r#"{"uniformity_threshold": 5.0}"#).unwrap();
        assert_eq!(p.min_region_size, 4);
        assert_eq!(p.uniformity_threshold, 5.0);
        assert_eq!(p.merge_threshold, None);
    }

    #[test]
    fn summary_matches_tree() {
        let img = GrayImageU8::from_fn(16, 16, |x, y| if x < 8 && y < 8 { 0 } else { 255 });
        let seg = segment_detailed(&img, &QuadTreeParams::new(4, 5.0)).unwrap();
        let summary = seg.summary();
        assert_eq!(summary.leaf_count, 4);
        assert_eq!(summary.node_count, 5);
        assert_eq!(summary.region_count, 4);
        assert_eq!(summary.max_depth, 1);
        assert_eq!(summary.leaves[0].value, 0);
    }
}
