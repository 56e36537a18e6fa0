use super::key::RunKey;
use crate::diagnostics::{ImageDescriptor, TimingBreakdown};
use crate::filters::{FilterKind, Provenance};
use crate::metrics::MetricRecord;
use serde::Serialize;

/// Metrics and provenance for one evaluated configuration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub key: RunKey,
    pub metrics: MetricRecord,
    /// Filter provenance; `None` when the run used no filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    pub elapsed_ms: f64,
}

/// Highest-PSNR filter observed for one image in the filter sweep.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestFilter {
    pub image: String,
    pub filter: FilterKind,
    pub kernel_size: u32,
    pub noise: f64,
    pub psnr: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub seed: u64,
    pub images: Vec<ImageDescriptor>,
    pub filter_runs: Vec<RunRecord>,
    pub best_filters: Vec<BestFilter>,
    pub segmentation_runs: Vec<RunRecord>,
    pub timing: TimingBreakdown,
}

impl RunRecord {
    /// True when the filter stage fell back to the unfiltered input.
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Some(Provenance::Fallback { .. }))
    }
}

impl SweepReport {
    pub fn find(&self, stem: &str) -> Option<&RunRecord> {
        self.filter_runs
            .iter()
            .chain(&self.segmentation_runs)
            .find(|r| r.key.stem() == stem)
    }
}

/// Pick, per image, the filter-sweep record with the highest PSNR.
///
/// Images keep their first-seen order; ties keep the earlier record.
pub fn best_filters(records: &[RunRecord]) -> Vec<BestFilter> {
    let mut best: Vec<BestFilter> = Vec::new();
    for rec in records {
        let (Some(filter), Some(kernel_size), Some(noise)) =
            (rec.key.filter, rec.key.kernel_size, rec.key.noise)
        else {
            continue;
        };
        let candidate = BestFilter {
            image: rec.key.image.clone(),
            filter,
            kernel_size,
            noise,
            psnr: rec.metrics.psnr,
        };
        match best.iter_mut().find(|b| b.image == rec.key.image) {
            Some(slot) if candidate.psnr > slot.psnr => *slot = candidate,
            Some(_) => {}
            None => best.push(candidate),
        }
    }
    best
}
