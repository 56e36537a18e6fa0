//! Uniform impulse noise.
//!
//! Each pixel is independently replaced, with probability `p`, by a fresh
//! intensity drawn uniformly from `[0, 255)` and truncated to an integer.
//! Draws come from a seeded PCG generator, so a given seed always produces
//! the same corrupted image.
use crate::image::GrayImageU8;
use crate::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

/// Per-pixel replacement probability in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub probability: f64,
}

impl NoiseConfig {
    /// Rejects NaN and anything outside `[0, 1]`; no clamping.
    pub fn new(probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::invalid(format!(
                "noise probability must lie in [0, 1], got {probability}"
            )));
        }
        Ok(Self { probability })
    }
}

/// Stateful injector owning its random stream.
#[derive(Clone, Debug)]
pub struct NoiseInjector {
    rng: Pcg64,
}

impl NoiseInjector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Return a corrupted copy of `image`.
    ///
    /// With `probability == 0` the copy is exact and no draws are consumed.
    pub fn inject(&mut self, image: &GrayImageU8, probability: f64) -> Result<GrayImageU8> {
        let config = NoiseConfig::new(probability)?;
        self.inject_with(image, config)
    }

    pub fn inject_with(&mut self, image: &GrayImageU8, config: NoiseConfig) -> Result<GrayImageU8> {
        let p = config.probability;
        if p == 0.0 {
            return Ok(image.clone());
        }
        let mut out = image.clone();
        let mut replaced = 0usize;
        for y in 0..out.height() {
            for x in 0..out.width() {
                if self.rng.random::<f64>() < p {
                    let v: f64 = self.rng.random_range(0.0..255.0);
                    out.set(x, y, v.clamp(0.0, 255.0) as u8);
                    replaced += 1;
                }
            }
        }
        log::debug!(
            "noise p={p:.2}: replaced {replaced}/{} pixels",
            out.width() * out.height()
        );
        Ok(out)
    }
}

/// One-shot helper: build a fresh injector from `seed` and corrupt `image`.
pub fn add_uniform_noise(image: &GrayImageU8, probability: f64, seed: u64) -> Result<GrayImageU8> {
    NoiseInjector::new(seed).inject(image, probability)
}
