//! Serializable run diagnostics: stage timings and input descriptors.
pub mod images;
pub mod timing;

pub use images::ImageDescriptor;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
