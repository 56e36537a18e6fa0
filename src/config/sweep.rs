use crate::filters::FilterKind;
use crate::segmentation::SegmentationMethod;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One named source image, resolved against `HarnessConfig::images_dir`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    pub file: PathBuf,
}

impl ImageEntry {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

/// Configuration of the whole evaluation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub images_dir: PathBuf,
    /// Filter-sweep outputs go to `<results_dir>/step1`, segmentation-sweep
    /// outputs to `<results_dir>/step2`, the report to
    /// `<results_dir>/report.json`.
    pub results_dir: PathBuf,
    pub images: Vec<ImageEntry>,
    /// Base seed; every noise realisation derives its own seed from it.
    pub seed: u64,
    /// Write every produced image to the sink.
    pub save_images: bool,
    pub filter_sweep: FilterSweepConfig,
    pub segmentation_sweep: SegmentationSweepConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            results_dir: PathBuf::from("results"),
            images: vec![
                ImageEntry::new("low_detail", "m_low.jpg"),
                ImageEntry::new("medium_detail", "m_mid.jpg"),
                ImageEntry::new("high_detail", "m_high.jpg"),
            ],
            seed: 717,
            save_images: true,
            filter_sweep: FilterSweepConfig::default(),
            segmentation_sweep: SegmentationSweepConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSweepConfig {
    pub enabled: bool,
    pub noise_levels: Vec<f64>,
    pub kernel_sizes: Vec<u32>,
    pub filters: Vec<FilterKind>,
}

impl Default for FilterSweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            noise_levels: vec![0.1, 0.5, 0.8],
            kernel_sizes: vec![5, 15],
            filters: FilterKind::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSweepConfig {
    pub enabled: bool,
    /// `null` means the raw, noise-free image.
    pub noise_levels: Vec<Option<f64>>,
    /// `null` means no filtering.
    pub kernel_sizes: Vec<Option<u32>>,
    pub best_filter: FilterKind,
    pub methods: Vec<SegmentationMethod>,
}

impl Default for SegmentationSweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            noise_levels: vec![None, Some(0.1), Some(0.5), Some(0.8)],
            kernel_sizes: vec![None, Some(5), Some(15)],
            best_filter: FilterKind::Bilateral,
            methods: SegmentationMethod::defaults(),
        }
    }
}

impl HarnessConfig {
    pub fn step1_dir(&self) -> PathBuf {
        self.results_dir.join("step1")
    }

    pub fn step2_dir(&self) -> PathBuf {
        self.results_dir.join("step2")
    }

    pub fn report_path(&self) -> PathBuf {
        self.results_dir.join("report.json")
    }

    pub fn image_path(&self, entry: &ImageEntry) -> PathBuf {
        resolve(&self.images_dir, &entry.file)
    }

    /// Check every probability and method parameter up front.
    pub fn validate(&self) -> Result<()> {
        let all_noise = self
            .filter_sweep
            .noise_levels
            .iter()
            .copied()
            .chain(self.segmentation_sweep.noise_levels.iter().flatten().copied());
        for p in all_noise {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::invalid(format!(
                    "noise level must lie in [0, 1], got {p}"
                )));
            }
        }
        for method in &self.segmentation_sweep.methods {
            match method {
                SegmentationMethod::KMeans(params) => params.validate()?,
                SegmentationMethod::QuadTree(params) => params.validate()?,
                SegmentationMethod::Otsu => {}
            }
        }
        Ok(())
    }
}

fn resolve(dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}
