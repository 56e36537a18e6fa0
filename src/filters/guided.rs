//! Self-guided filter (He, Sun, Tang).
//!
//! Local linear model `q = a·I + b` fitted in `(2r+1)²` windows, with `eps`
//! in squared 8-bit intensity units. Window means near the border average
//! only the pixels inside the image.
use crate::image::{GrayImageU8, ImageF32, ImageView, ImageViewMut};

/// Filter `input` using `guide` as the guidance image. Shapes must match.
pub fn guided(guide: &GrayImageU8, input: &GrayImageU8, radius: u32, eps: f32) -> GrayImageU8 {
    debug_assert_eq!(
        (guide.width(), guide.height()),
        (input.width(), input.height())
    );
    let r = radius as usize;
    let i = ImageF32::from_u8(guide);
    let p = ImageF32::from_u8(input);

    let mean_i = box_mean(&i, r);
    let mean_p = box_mean(&p, r);
    let corr_i = box_mean(&i.mul(&i), r);
    let corr_ip = box_mean(&i.mul(&p), r);

    let mut a = ImageF32::new(i.w, i.h);
    let mut b = ImageF32::new(i.w, i.h);
    for y in 0..i.h {
        for x in 0..i.w {
            let mi = mean_i.get(x, y);
            let mp = mean_p.get(x, y);
            let var_i = corr_i.get(x, y) - mi * mi;
            let cov_ip = corr_ip.get(x, y) - mi * mp;
            let ak = cov_ip / (var_i + eps);
            a.set(x, y, ak);
            b.set(x, y, mp - ak * mi);
        }
    }

    let mean_a = box_mean(&a, r);
    let mean_b = box_mean(&b, r);
    let mut q = ImageF32::new(i.w, i.h);
    for y in 0..q.h {
        let guide_row = i.row(y);
        let (ra, rb) = (mean_a.row(y), mean_b.row(y));
        for (x, out) in q.row_mut(y).iter_mut().enumerate() {
            *out = ra[x] * guide_row[x] + rb[x];
        }
    }
    q.to_u8()
}

/// Mean over the clipped `(2r+1)²` window, via a summed-area table.
fn box_mean(src: &ImageF32, r: usize) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let sw = w + 1;
    let mut sat = vec![0.0f64; sw * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0.0f64;
        for (x, &v) in src.row(y).iter().enumerate() {
            row_sum += v as f64;
            sat[(y + 1) * sw + x + 1] = sat[y * sw + x + 1] + row_sum;
        }
    }
    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r + 1).min(w);
            let sum = sat[y1 * sw + x1] - sat[y0 * sw + x1] - sat[y1 * sw + x0] + sat[y0 * sw + x0];
            let n = ((y1 - y0) * (x1 - x0)) as f64;
            out.set(x, y, (sum / n) as f32);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_mean_clips_at_border() {
        let mut img = ImageF32::new(3, 1);
        img.data.copy_from_slice(&[0.0, 3.0, 6.0]);
        let m = box_mean(&img, 1);
        assert_eq!(m.data, vec![1.5, 3.0, 4.5]);
    }

    #[test]
    fn small_eps_is_nearly_identity() {
        let img = GrayImageU8::from_fn(24, 24, |x, y| if (x * 7 + y * 13) % 5 == 0 { 250 } else { 60 });
        let out = guided(&img, &img, 2, 0.4);
        let worst = img
            .pixels()
            .iter()
            .zip(out.pixels())
            .map(|(&a, &b)| (a as i32 - b as i32).abs())
            .max()
            .unwrap();
        assert!(worst <= 1, "max deviation {worst}");
    }

    #[test]
    fn large_eps_smooths_towards_mean() {
        let img = GrayImageU8::from_fn(16, 16, |x, _| if x % 2 == 0 { 0 } else { 200 });
        let out = guided(&img, &img, 2, 1.0e7);
        assert!(out.pixels().iter().all(|&v| (60..=140).contains(&v)));
    }

    #[test]
    fn constant_image_is_unchanged() {
        let img = GrayImageU8::filled(10, 7, 123);
        assert_eq!(guided(&img, &img, 3, 0.4), img);
    }
}
