//! Evaluation harness: nested sweeps over images, noise levels, filters and
//! segmentation methods, scored with PSNR/SSIM against the raw image.
//!
//! Filter sweep
//! - image × noise level × kernel size × filter. Noise is injected once per
//!   (image, noise level) and shared by every filter at that level.
//!
//! Segmentation sweep
//! - image × {none, noise levels} × {none, kernel sizes} × method, using the
//!   configured `best_filter` for the filter stage.
//!
//! Every noise realisation gets its own seed from [`noise_seed`], so results
//! do not depend on evaluation order. With the `parallel` feature the runs of
//! each sweep are evaluated on rayon; records keep job order and the sink is
//! always written from the calling thread.
mod key;
mod record;
mod sink;

pub use key::{RunKey, Stage};
pub use record::{best_filters, BestFilter, RunRecord, SweepReport};
pub use sink::{DirectorySink, MemorySink, ResultSink};

use crate::config::HarnessConfig;
use crate::diagnostics::{elapsed_ms, ImageDescriptor, StageTiming, TimingBreakdown};
use crate::filters::{apply_filter, Provenance};
use crate::image::io::load_grayscale_image;
use crate::image::GrayImageU8;
use crate::metrics::compare;
use crate::noise::add_uniform_noise;
use crate::{Error, Result};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A named input image.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub name: String,
    pub image: GrayImageU8,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, image: GrayImageU8) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

pub struct Harness<S: ResultSink> {
    config: HarnessConfig,
    sink: S,
}

impl<S: ResultSink> Harness<S> {
    /// Validate `config` and bind it to `sink`.
    pub fn new(config: HarnessConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Load every configured image. Missing or undecodable files are skipped
    /// with a warning; it is an error only if none load.
    pub fn load_images(&self) -> Result<Vec<SourceImage>> {
        let mut loaded = Vec::new();
        for entry in &self.config.images {
            let path = self.config.image_path(entry);
            match load_grayscale_image(&path) {
                Ok(image) => {
                    log::debug!(
                        "loaded {} ({}x{}) from {}",
                        entry.name,
                        image.width(),
                        image.height(),
                        path.display()
                    );
                    loaded.push(SourceImage::new(entry.name.clone(), image));
                }
                Err(err) => log::warn!("skipping image {}: {err}", entry.name),
            }
        }
        if loaded.is_empty() {
            return Err(Error::NotFound(self.config.images_dir.clone()));
        }
        Ok(loaded)
    }

    /// Load the configured images and run both sweeps.
    pub fn run(&mut self) -> Result<SweepReport> {
        let start = Instant::now();
        let images = self.load_images()?;
        let load_ms = elapsed_ms(start);
        let mut report = self.run_with_images(&images)?;
        report.timing.stages.insert(0, StageTiming::new("load", load_ms));
        report.timing.total_ms = elapsed_ms(start);
        Ok(report)
    }

    /// Run both sweeps on already-loaded images and hand the report to the
    /// sink.
    pub fn run_with_images(&mut self, images: &[SourceImage]) -> Result<SweepReport> {
        let start = Instant::now();
        let mut timing = TimingBreakdown::default();
        let mut report = SweepReport {
            seed: self.config.seed,
            images: images
                .iter()
                .map(|s| ImageDescriptor::from_image(&s.name, &s.image))
                .collect(),
            ..SweepReport::default()
        };

        if self.config.filter_sweep.enabled {
            let t0 = Instant::now();
            let runs = self.filter_sweep(images)?;
            report.filter_runs = self.store(runs)?;
            report.best_filters = best_filters(&report.filter_runs);
            timing.push("filter_sweep", elapsed_ms(t0));
        }
        if self.config.segmentation_sweep.enabled {
            let t0 = Instant::now();
            let runs = self.segmentation_sweep(images)?;
            report.segmentation_runs = self.store(runs)?;
            timing.push("segmentation_sweep", elapsed_ms(t0));
        }

        timing.total_ms = elapsed_ms(start);
        report.timing = timing;
        log::debug!(
            "sweep finished: {} filter runs, {} segmentation runs in {:.1} ms",
            report.filter_runs.len(),
            report.segmentation_runs.len(),
            report.timing.total_ms
        );
        self.sink.save_report(&report)?;
        Ok(report)
    }

    fn store(&mut self, runs: Vec<(RunRecord, GrayImageU8)>) -> Result<Vec<RunRecord>> {
        let mut records = Vec::with_capacity(runs.len());
        for (record, image) in runs {
            if self.config.save_images {
                self.sink.save_image(&record.key, &image)?;
            }
            records.push(record);
        }
        Ok(records)
    }

    fn filter_sweep(&self, images: &[SourceImage]) -> Result<Vec<(RunRecord, GrayImageU8)>> {
        let sweep = &self.config.filter_sweep;
        let mut noisy = Vec::new();
        for (ii, src) in images.iter().enumerate() {
            for (ni, &p) in sweep.noise_levels.iter().enumerate() {
                let seed = noise_seed(self.config.seed, Stage::FilterSweep, ii, ni);
                noisy.push((src, p, add_uniform_noise(&src.image, p, seed)?));
            }
        }

        let mut jobs = Vec::new();
        for (src, p, img) in &noisy {
            for &kernel in &sweep.kernel_sizes {
                for &filter in &sweep.filters {
                    jobs.push((*src, *p, img, kernel, filter));
                }
            }
        }
        evaluate(&jobs, |&(src, p, input, kernel, filter)| {
            let start = Instant::now();
            let out = apply_filter(input, filter, kernel);
            let elapsed = elapsed_ms(start);
            let metrics = compare(&src.image, &out.image)?;
            let record = RunRecord {
                key: RunKey::filter_run(&src.name, p, kernel, filter),
                metrics,
                provenance: Some(out.provenance),
                elapsed_ms: elapsed,
            };
            Ok((record, out.image))
        })
    }

    fn segmentation_sweep(
        &self,
        images: &[SourceImage],
    ) -> Result<Vec<(RunRecord, GrayImageU8)>> {
        let sweep = &self.config.segmentation_sweep;
        let base_seed = self.config.seed;
        let filter = sweep.best_filter;

        let mut noisy = Vec::new();
        for (image_index, src) in images.iter().enumerate() {
            for (noise_index, &noise) in sweep.noise_levels.iter().enumerate() {
                let image = match noise {
                    None => src.image.clone(),
                    Some(p) => {
                        let seed =
                            noise_seed(base_seed, Stage::SegmentationSweep, image_index, noise_index);
                        add_uniform_noise(&src.image, p, seed)?
                    }
                };
                noisy.push(StageInput {
                    image_index,
                    noise_index,
                    noise,
                    kernel_size: None,
                    image,
                    provenance: None,
                });
            }
        }

        let mut filter_jobs = Vec::new();
        for input in &noisy {
            for &kernel_size in &sweep.kernel_sizes {
                filter_jobs.push((input, kernel_size));
            }
        }
        let prepared = evaluate(&filter_jobs, |&(input, kernel_size)| {
            Ok(match kernel_size {
                None => input.clone(),
                Some(k) => {
                    let out = apply_filter(&input.image, filter, k);
                    StageInput {
                        image_index: input.image_index,
                        noise_index: input.noise_index,
                        noise: input.noise,
                        kernel_size,
                        image: out.image,
                        provenance: Some(out.provenance),
                    }
                }
            })
        })?;

        let mut jobs = Vec::new();
        for input in &prepared {
            for (method_index, method) in sweep.methods.iter().enumerate() {
                jobs.push((input, method_index, method));
            }
        }
        evaluate(&jobs, |&(input, method_index, method)| {
            let src = &images[input.image_index];
            let seed = method_seed(base_seed, input.image_index, input.noise_index, method_index);
            let start = Instant::now();
            let segmented = method.apply(&input.image, seed)?;
            let elapsed = elapsed_ms(start);
            let metrics = compare(&src.image, &segmented)?;
            let record = RunRecord {
                key: RunKey::segmentation_run(
                    &src.name,
                    input.noise,
                    input.kernel_size,
                    filter,
                    method.name(),
                ),
                metrics,
                provenance: input.provenance.clone(),
                elapsed_ms: elapsed,
            };
            Ok((record, segmented))
        })
    }
}

/// Image entering the segmentation stage, with the path that produced it.
#[derive(Clone, Debug)]
struct StageInput {
    image_index: usize,
    noise_index: usize,
    noise: Option<f64>,
    kernel_size: Option<u32>,
    image: GrayImageU8,
    provenance: Option<Provenance>,
}

/// Map `f` over `jobs`, in parallel when the `parallel` feature is on.
/// Output order matches `jobs`; the first error wins.
fn evaluate<J, T, F>(jobs: &[J], f: F) -> Result<Vec<T>>
where
    J: Sync,
    T: Send,
    F: Fn(&J) -> Result<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        jobs.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter().map(f).collect()
    }
}

/// SplitMix64 finaliser.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn derive_seed(base: u64, parts: &[u64]) -> u64 {
    parts.iter().fold(mix(base), |acc, &p| mix(acc ^ p))
}

/// Seed of the noise realisation for (`image_index`, `noise_index`) in `stage`.
pub fn noise_seed(base: u64, stage: Stage, image_index: usize, noise_index: usize) -> u64 {
    let salt = match stage {
        Stage::FilterSweep => 1,
        Stage::SegmentationSweep => 2,
    };
    derive_seed(base, &[salt, image_index as u64, noise_index as u64])
}

fn method_seed(base: u64, image_index: usize, noise_index: usize, method_index: usize) -> u64 {
    derive_seed(
        base,
        &[3, image_index as u64, noise_index as u64, method_index as u64],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_differ_by_position_and_stage() {
        let a = noise_seed(717, Stage::FilterSweep, 0, 0);
        assert_eq!(a, noise_seed(717, Stage::FilterSweep, 0, 0));
        assert_ne!(a, noise_seed(717, Stage::FilterSweep, 0, 1));
        assert_ne!(a, noise_seed(717, Stage::FilterSweep, 1, 0));
        assert_ne!(a, noise_seed(717, Stage::SegmentationSweep, 0, 0));
        assert_ne!(a, noise_seed(718, Stage::FilterSweep, 0, 0));
    }

    #[test]
    fn evaluate_keeps_order_and_propagates_errors() {
        let jobs: Vec<u32> = (0..50).collect();
        let out = evaluate(&jobs, |&j| Ok(j * 2)).unwrap();
        assert_eq!(out, (0..50).map(|j| j * 2).collect::<Vec<_>>());
        let err = evaluate(&jobs, |&j| {
            if j == 7 {
                Err(Error::invalid("boom"))
            } else {
                Ok(j)
            }
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
