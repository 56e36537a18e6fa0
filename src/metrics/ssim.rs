//! Mean structural similarity (MSSIM).
//!
//! Local statistics use a 7×7 uniform window with reflect ("half-sample
//! symmetric") border handling and the unbiased covariance normalisation
//! `N / (N − 1)`. The per-pixel SSIM map is averaged over the interior,
//! excluding a border of `SSIM_WINDOW / 2` pixels. Constants:
//! `C1 = (0.01·255)²`, `C2 = (0.03·255)²`.
use super::DATA_RANGE;
use crate::image::{ensure_same_shape, GrayImageU8};
use crate::{Error, Result};

/// Side of the square averaging window.
pub const SSIM_WINDOW: usize = 7;

const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Mean SSIM of `candidate` against `reference`.
///
/// Both images must have the same shape and be at least `SSIM_WINDOW`
/// pixels in each dimension.
pub fn ssim(reference: &GrayImageU8, candidate: &GrayImageU8) -> Result<f64> {
    ensure_same_shape(reference, candidate)?;
    let (w, h) = (reference.width(), reference.height());
    if w < SSIM_WINDOW || h < SSIM_WINDOW {
        return Err(Error::invalid(format!(
            "ssim needs at least {SSIM_WINDOW}x{SSIM_WINDOW} pixels, got {w}x{h}"
        )));
    }

    let x: Vec<f64> = reference.pixels().iter().map(|&v| v as f64).collect();
    let y: Vec<f64> = candidate.pixels().iter().map(|&v| v as f64).collect();
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a * b).collect();

    let ux = box_mean_reflect(&x, w, h, SSIM_WINDOW);
    let uy = box_mean_reflect(&y, w, h, SSIM_WINDOW);
    let uxx = box_mean_reflect(&xx, w, h, SSIM_WINDOW);
    let uyy = box_mean_reflect(&yy, w, h, SSIM_WINDOW);
    let uxy = box_mean_reflect(&xy, w, h, SSIM_WINDOW);

    let np = (SSIM_WINDOW * SSIM_WINDOW) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let pad = SSIM_WINDOW / 2;
    let mut total = 0.0;
    let mut count = 0usize;
    for row in pad..h - pad {
        for col in pad..w - pad {
            let i = row * w + col;
            let (mx, my) = (ux[i], uy[i]);
            let vx = cov_norm * (uxx[i] - mx * mx);
            let vy = cov_norm * (uyy[i] - my * my);
            let vxy = cov_norm * (uxy[i] - mx * my);
            let a1 = 2.0 * mx * my + c1;
            let a2 = 2.0 * vxy + c2;
            let b1 = mx * mx + my * my + c1;
            let b2 = vx + vy + c2;
            total += (a1 * a2) / (b1 * b2);
            count += 1;
        }
    }
    Ok(total / count as f64)
}

/// Reflect an out-of-range index back into `0..n` (`d c b a | a b c d`).
#[inline]
fn reflect(i: isize, n: usize) -> usize {
    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        i = if i < 0 { -i - 1 } else { 2 * n - i - 1 };
    }
    i as usize
}

/// Separable `win × win` mean filter with reflected borders.
fn box_mean_reflect(src: &[f64], w: usize, h: usize, win: usize) -> Vec<f64> {
    let r = (win / 2) as isize;
    let inv = 1.0 / win as f64;
    let mut tmp = vec![0.0; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0;
            for k in -r..=r {
                acc += row[reflect(x as isize + k, w)];
            }
            tmp[y * w + x] = acc * inv;
        }
    }
    let mut out = vec![0.0; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for k in -r..=r {
                acc += tmp[reflect(y as isize + k, h) * w + x];
            }
            out[y * w + x] = acc * inv;
        }
    }
    out
}
