use crate::filters::FilterKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Noise → filter, scored against the raw image.
    FilterSweep,
    /// Noise → optional filter → segmentation, scored against the raw image.
    SegmentationSweep,
}

/// Identity of one evaluated configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunKey {
    pub stage: Stage,
    pub image: String,
    /// `None`: the noise-free image.
    pub noise: Option<f64>,
    /// `None`: no filtering.
    pub kernel_size: Option<u32>,
    pub filter: Option<FilterKind>,
    pub method: Option<String>,
}

impl RunKey {
    pub fn filter_run(image: &str, noise: f64, kernel_size: u32, filter: FilterKind) -> Self {
        Self {
            stage: Stage::FilterSweep,
            image: image.to_string(),
            noise: Some(noise),
            kernel_size: Some(kernel_size),
            filter: Some(filter),
            method: None,
        }
    }

    pub fn segmentation_run(
        image: &str,
        noise: Option<f64>,
        kernel_size: Option<u32>,
        filter: FilterKind,
        method: &str,
    ) -> Self {
        Self {
            stage: Stage::SegmentationSweep,
            image: image.to_string(),
            noise,
            kernel_size,
            filter: kernel_size.map(|_| filter),
            method: Some(method.to_string()),
        }
    }

    /// File stem for the artifact of this run, e.g.
    /// `low_detail_0.5_15_median` or `low_detail_no_noise_filter_5_otsu`.
    pub fn stem(&self) -> String {
        match self.stage {
            Stage::FilterSweep => format!(
                "{}_{:.1}_{}_{}",
                self.image,
                self.noise.unwrap_or(0.0),
                self.kernel_size.unwrap_or(0),
                self.filter.map_or("none", FilterKind::name),
            ),
            Stage::SegmentationSweep => {
                let noise = self
                    .noise
                    .map_or_else(|| "no_noise".to_string(), |p| format!("noise_{p:.1}"));
                let filter = self
                    .kernel_size
                    .map_or_else(|| "no_filter".to_string(), |k| format!("filter_{k}"));
                format!(
                    "{}_{noise}_{filter}_{}",
                    self.image,
                    self.method.as_deref().unwrap_or("none")
                )
            }
        }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_stem() {
        let key = RunKey::filter_run("low_detail", 0.5, 15, FilterKind::Median);
        assert_eq!(key.stem(), "low_detail_0.5_15_median");
    }

    #[test]
    fn segmentation_stems() {
        let raw = RunKey::segmentation_run("high_detail", None, None, FilterKind::Bilateral, "otsu");
        assert_eq!(raw.stem(), "high_detail_no_noise_no_filter_otsu");
        assert_eq!(raw.filter, None);
        let filtered = RunKey::segmentation_run(
            "high_detail",
            Some(0.1),
            Some(5),
            FilterKind::Bilateral,
            "split_merge",
        );
        assert_eq!(filtered.stem(), "high_detail_noise_0.1_filter_5_split_merge");
        assert_eq!(filtered.filter, Some(FilterKind::Bilateral));
    }
}
