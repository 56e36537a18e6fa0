//! Seeded 1-D k-means over pixel intensities.
//!
//! Lloyd iterations run on the 256-bin histogram rather than on individual
//! pixels, which gives the same centres at a fraction of the cost. Each
//! attempt starts from centres drawn uniformly in `[min, max]` of the image;
//! the attempt with the lowest compactness (sum of squared distances) wins.
use crate::image::GrayImageU8;
use crate::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    pub clusters: usize,
    pub attempts: usize,
    pub max_iterations: usize,
    /// Stop once no centre moves by more than this.
    pub epsilon: f64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            clusters: 2,
            attempts: 10,
            max_iterations: 100,
            epsilon: 0.2,
        }
    }
}

impl KMeansParams {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.clusters) {
            return Err(Error::invalid(format!(
                "kmeans clusters must be in 1..=256, got {}",
                self.clusters
            )));
        }
        if self.attempts == 0 || self.max_iterations == 0 {
            return Err(Error::invalid("kmeans attempts and max_iterations must be positive"));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::invalid(format!(
                "kmeans epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

struct Clustering {
    centres: Vec<f64>,
    compactness: f64,
}

/// Replace every pixel by the (truncated) centre of its intensity cluster.
pub fn kmeans(image: &GrayImageU8, params: &KMeansParams, seed: u64) -> Result<GrayImageU8> {
    params.validate()?;
    if image.is_empty() {
        return Err(Error::invalid("cannot cluster an empty image"));
    }
    let mut hist = [0u64; 256];
    for &v in image.pixels() {
        hist[v as usize] += 1;
    }
    let lo = hist.iter().position(|&c| c > 0).unwrap_or(0) as f64;
    let hi = hist.iter().rposition(|&c| c > 0).unwrap_or(0) as f64;

    let mut rng = Pcg64::seed_from_u64(seed);
    let mut best: Option<Clustering> = None;
    for _ in 0..params.attempts {
        let init: Vec<f64> = (0..params.clusters)
            .map(|_| if hi > lo { rng.random_range(lo..=hi) } else { lo })
            .collect();
        let run = lloyd(&hist, init, params);
        if best.as_ref().map_or(true, |b| run.compactness < b.compactness) {
            best = Some(run);
        }
    }
    let Some(best) = best else {
        return Err(Error::invalid("kmeans produced no clustering"));
    };
    log::debug!(
        "kmeans k={}: centres {:?} compactness {:.1}",
        params.clusters,
        best.centres,
        best.compactness
    );

    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        let c = best.centres[nearest(&best.centres, v as f64)];
        *slot = c.clamp(0.0, 255.0) as u8;
    }
    Ok(GrayImageU8::from_fn(image.width(), image.height(), |x, y| {
        lut[image.get(x, y) as usize]
    }))
}

fn nearest(centres: &[f64], v: f64) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, &c) in centres.iter().enumerate() {
        let d = (v - c).abs();
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

fn lloyd(hist: &[u64; 256], mut centres: Vec<f64>, params: &KMeansParams) -> Clustering {
    let k = centres.len();
    for _ in 0..params.max_iterations {
        let mut sums = vec![0.0f64; k];
        let mut counts = vec![0u64; k];
        for (v, &count) in hist.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let c = nearest(&centres, v as f64);
            sums[c] += v as f64 * count as f64;
            counts[c] += count;
        }
        let mut shift = 0.0f64;
        for i in 0..k {
            // Empty clusters keep their previous centre.
            if counts[i] > 0 {
                let next = sums[i] / counts[i] as f64;
                shift = shift.max((next - centres[i]).abs());
                centres[i] = next;
            }
        }
        if shift <= params.epsilon {
            break;
        }
    }
    let compactness = hist
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(v, &count)| {
            let d = v as f64 - centres[nearest(&centres, v as f64)];
            d * d * count as f64
        })
        .sum();
    Clustering {
        centres,
        compactness,
    }
}
