//! Fidelity metrics between a reference image and a candidate.
//!
//! - `psnr`: peak signal-to-noise ratio in dB, `+∞` for identical images.
//! - `ssim`: mean structural similarity over a 7×7 uniform window.
//!
//! Both are pure, symmetric in their inputs, and require equal shapes.
mod psnr;
mod ssim;

pub use psnr::{mse, psnr};
pub use ssim::{ssim, SSIM_WINDOW};

use crate::image::GrayImageU8;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Peak value of the 8-bit data range.
pub const DATA_RANGE: f64 = 255.0;

/// PSNR/SSIM pair for one (reference, candidate) comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// dB; serialised as `null` when infinite.
    #[serde(with = "finite_or_null")]
    pub psnr: f64,
    pub ssim: f64,
}

/// Compute both metrics for `candidate` against `reference`.
pub fn compare(reference: &GrayImageU8, candidate: &GrayImageU8) -> Result<MetricRecord> {
    Ok(MetricRecord {
        psnr: psnr(reference, candidate)?,
        ssim: ssim(reference, candidate)?,
    })
}

/// JSON has no infinity; an exact match is written as `null` and read back
/// as `+∞`.
mod finite_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_f64(*v)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_psnr_survives_json() {
        let rec = MetricRecord {
            psnr: f64::INFINITY,
            ssim: 1.0,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"psnr":null,"ssim":1.0}"#);
        let back: MetricRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn compare_identical_images() {
        let img = GrayImageU8::from_fn(16, 16, |x, y| (x * 16 + y) as u8);
        let rec = compare(&img, &img).unwrap();
        assert!(rec.psnr.is_infinite());
        assert!((rec.ssim - 1.0).abs() < 1e-9);
    }
}
