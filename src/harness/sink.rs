//! Destinations for sweep artifacts.
use super::key::{RunKey, Stage};
use super::record::SweepReport;
use crate::config::HarnessConfig;
use crate::image::io::{ensure_dir, save_grayscale_u8, write_json_file};
use crate::image::GrayImageU8;
use crate::Result;
use std::path::{Path, PathBuf};

/// Receives every produced image and the final report.
pub trait ResultSink {
    fn save_image(&mut self, key: &RunKey, image: &GrayImageU8) -> Result<()>;
    fn save_report(&mut self, report: &SweepReport) -> Result<()>;
}

/// Writes `<step1>/<stem>.png`, `<step2>/<stem>.png` and a JSON report.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    step1_dir: PathBuf,
    step2_dir: PathBuf,
    report_path: PathBuf,
}

impl DirectorySink {
    pub fn new(
        step1_dir: impl Into<PathBuf>,
        step2_dir: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            step1_dir: step1_dir.into(),
            step2_dir: step2_dir.into(),
            report_path: report_path.into(),
        }
    }

    /// The `step1` / `step2` / `report.json` layout of `config`.
    pub fn for_config(config: &HarnessConfig) -> Self {
        Self::new(config.step1_dir(), config.step2_dir(), config.report_path())
    }

    pub fn image_path(&self, key: &RunKey) -> PathBuf {
        let dir = match key.stage {
            Stage::FilterSweep => &self.step1_dir,
            Stage::SegmentationSweep => &self.step2_dir,
        };
        dir.join(format!("{}.png", key.stem()))
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Create both output directories up front.
    pub fn prepare(&self) -> Result<()> {
        ensure_dir(&self.step1_dir)?;
        ensure_dir(&self.step2_dir)
    }
}

impl ResultSink for DirectorySink {
    fn save_image(&mut self, key: &RunKey, image: &GrayImageU8) -> Result<()> {
        save_grayscale_u8(image, &self.image_path(key))
    }

    fn save_report(&mut self, report: &SweepReport) -> Result<()> {
        write_json_file(&self.report_path, report)
    }
}

/// Keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub images: Vec<(RunKey, GrayImageU8)>,
    pub reports: Vec<SweepReport>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self, stem: &str) -> Option<&GrayImageU8> {
        self.images
            .iter()
            .find(|(key, _)| key.stem() == stem)
            .map(|(_, img)| img)
    }
}

impl ResultSink for MemorySink {
    fn save_image(&mut self, key: &RunKey, image: &GrayImageU8) -> Result<()> {
        self.images.push((key.clone(), image.clone()));
        Ok(())
    }

    fn save_report(&mut self, report: &SweepReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn save_image(&mut self, key: &RunKey, image: &GrayImageU8) -> Result<()> {
        (**self).save_image(key, image)
    }

    fn save_report(&mut self, report: &SweepReport) -> Result<()> {
        (**self).save_report(report)
    }
}
