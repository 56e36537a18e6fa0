//! Segmentation methods compared by the harness.
//!
//! - [`SegmentationMethod::QuadTree`]: the recursive split in
//!   [`crate::quadtree`].
//! - [`SegmentationMethod::KMeans`]: intensity clustering, each pixel painted
//!   with its cluster centre.
//! - [`SegmentationMethod::Otsu`]: global binarisation at Otsu's level.
mod kmeans;
mod otsu;

pub use kmeans::{kmeans, KMeansParams};
pub use otsu::otsu;

use crate::image::GrayImageU8;
use crate::quadtree::{self, QuadTreeParams};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SegmentationMethod {
    #[serde(rename = "kmeans")]
    KMeans(KMeansParams),
    QuadTree(QuadTreeParams),
    Otsu,
}

impl SegmentationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SegmentationMethod::KMeans(_) => "kmeans",
            SegmentationMethod::QuadTree(_) => "split_merge",
            SegmentationMethod::Otsu => "otsu",
        }
    }

    /// Defaults used by the segmentation sweep: k-means with two clusters,
    /// the default quad-tree, and Otsu.
    pub fn defaults() -> Vec<SegmentationMethod> {
        vec![
            SegmentationMethod::KMeans(KMeansParams::default()),
            SegmentationMethod::QuadTree(QuadTreeParams::default()),
            SegmentationMethod::Otsu,
        ]
    }

    /// Run the method. `seed` drives k-means initialisation only.
    pub fn apply(&self, image: &GrayImageU8, seed: u64) -> Result<GrayImageU8> {
        match self {
            SegmentationMethod::KMeans(params) => kmeans(image, params, seed),
            SegmentationMethod::QuadTree(params) => quadtree::segment(image, params),
            SegmentationMethod::Otsu => otsu(image),
        }
    }
}

impl fmt::Display for SegmentationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
