use super::DATA_RANGE;
use crate::image::{ensure_same_shape, GrayImageU8};
use crate::{Error, Result};

/// Mean squared error over all pixels, accumulated in f64.
pub fn mse(reference: &GrayImageU8, candidate: &GrayImageU8) -> Result<f64> {
    ensure_same_shape(reference, candidate)?;
    if reference.is_empty() {
        return Err(Error::invalid("cannot compare empty images"));
    }
    let sum: f64 = reference
        .pixels()
        .iter()
        .zip(candidate.pixels())
        .map(|(&r, &c)| {
            let d = r as f64 - c as f64;
            d * d
        })
        .sum();
    Ok(sum / reference.len() as f64)
}

/// `20·log10(255 / sqrt(MSE))`, or `+∞` when the images are identical.
pub fn psnr(reference: &GrayImageU8, candidate: &GrayImageU8) -> Result<f64> {
    let mse = mse(reference, candidate)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(20.0 * (DATA_RANGE / mse.sqrt()).log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_is_infinite() {
        let img = GrayImageU8::from_fn(8, 8, |x, y| (x * y) as u8);
        assert_eq!(psnr(&img, &img).unwrap(), f64::INFINITY);
    }

    #[test]
    fn known_value() {
        // Uniform error of 1 → MSE 1 → 20·log10(255) ≈ 48.1308.
        let a = GrayImageU8::filled(10, 10, 100);
        let b = GrayImageU8::filled(10, 10, 101);
        let v = psnr(&a, &b).unwrap();
        assert!((v - 48.130_803_608).abs() < 1e-6, "psnr={v}");
    }

    #[test]
    fn extreme_difference_does_not_wrap() {
        let a = GrayImageU8::filled(4, 4, 0);
        let b = GrayImageU8::filled(4, 4, 255);
        assert_eq!(mse(&a, &b).unwrap(), 65025.0);
        assert!(psnr(&a, &b).unwrap().abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch() {
        let a = GrayImageU8::new(4, 4);
        let b = GrayImageU8::new(4, 5);
        let err = psnr(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: (4, 4),
                actual: (4, 5)
            }
        ));
    }

    #[test]
    fn empty_images_rejected() {
        let a = GrayImageU8::new(0, 0);
        assert!(matches!(psnr(&a, &a), Err(Error::InvalidArgument(_))));
    }
}
