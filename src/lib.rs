#![doc = include_str!("../README.md")]

// Core algorithms
pub mod filters;
pub mod metrics;
pub mod noise;
pub mod quadtree;
pub mod segmentation;

// Images, configuration and the evaluation driver
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod harness;
pub mod image;
pub mod pipeline;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Error, Result};

pub use crate::filters::{apply_filter, FilterKind, FilterOutput, Provenance};
pub use crate::metrics::{compare, psnr, ssim, MetricRecord};
pub use crate::noise::{add_uniform_noise, NoiseInjector};
pub use crate::quadtree::{segment, segment_detailed, QuadTree, QuadTreeParams, Segmentation};
pub use crate::segmentation::SegmentationMethod;

pub use crate::config::HarnessConfig;
pub use crate::harness::{DirectorySink, Harness, MemorySink, ResultSink, SweepReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use quadseg::prelude::*;
///
/// # fn main() -> quadseg::Result<()> {
/// let img = GrayImageU8::from_fn(64, 64, |x, y| if x < 32 && y < 32 { 0 } else { 255 });
/// let noisy = add_uniform_noise(&img, 0.1, 7)?;
/// let seg = segment(&noisy, &QuadTreeParams::default())?;
/// println!("psnr={:.2} db", psnr(&img, &seg)?);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::GrayImageU8;
    pub use crate::{
        add_uniform_noise, apply_filter, compare, psnr, segment, ssim, FilterKind,
        QuadTreeParams, SegmentationMethod,
    };
}
