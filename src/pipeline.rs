//! Single-image pipeline behind `quadseg_segment`: load, optional noise,
//! optional filter, quad-tree segmentation, then write the map and an
//! optional JSON leaf report.
use crate::config::segment::SegmentToolConfig;
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::filters::{apply_filter, Provenance};
use crate::image::io::{load_grayscale_image, save_grayscale_u8, write_json_file};
use crate::metrics::psnr;
use crate::noise::NoiseInjector;
use crate::quadtree::{segment_detailed, SegmentationSummary};
use crate::Result;
use serde::Serialize;
use std::time::Instant;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    /// Segmentation against the loaded image; `null` for an exact match.
    pub psnr: Option<f64>,
    /// `None` when no filter stage was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Provenance>,
    pub timing: TimingBreakdown,
    pub segmentation: SegmentationSummary,
}

/// Run the configured pipeline and write its outputs.
pub fn run_segment_tool(config: &SegmentToolConfig) -> Result<SegmentReport> {
    let start = Instant::now();
    let mut timing = TimingBreakdown::default();

    let raw = timing.time("load", || load_grayscale_image(&config.input))?;
    let mut input = raw.clone();
    if let Some(noise) = &config.noise {
        let mut injector = NoiseInjector::new(noise.seed);
        input = timing.time("noise", || injector.inject(&input, noise.probability))?;
    }
    let mut filter = None;
    if let Some(stage) = &config.filter {
        let out = timing.time("filter", || apply_filter(&input, stage.kind, stage.kernel_size));
        filter = Some(out.provenance);
        input = out.image;
    }

    let seg = segment_detailed(&input, &config.quadtree)?;
    timing.push("segment", seg.elapsed_ms);
    save_grayscale_u8(&seg.image, &config.output.image)?;
    let score = psnr(&raw, &seg.image)?;
    timing.total_ms = elapsed_ms(start);

    let report = SegmentReport {
        psnr: score.is_finite().then_some(score),
        filter,
        timing,
        segmentation: seg.summary(),
    };
    if let Some(path) = &config.output.summary_json {
        write_json_file(path, &report)?;
    }
    log::debug!(
        "segmented {}: {} leaves in {:.2} ms",
        config.input.display(),
        report.segmentation.leaf_count,
        report.timing.total_ms
    );
    Ok(report)
}
