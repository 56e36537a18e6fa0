use crate::image::GrayImageU8;
use crate::{Error, Result};

/// Binarise at Otsu's level: pixels strictly above it become 255, the rest 0.
pub fn otsu(image: &GrayImageU8) -> Result<GrayImageU8> {
    if image.is_empty() {
        return Err(Error::invalid("cannot threshold an empty image"));
    }
    let level = imageproc::contrast::otsu_level(&image.to_gray_image());
    log::debug!("otsu level {level}");
    Ok(GrayImageU8::from_fn(image.width(), image.height(), |x, y| {
        if image.get(x, y) > level {
            255
        } else {
            0
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_bimodal_image() {
        let img = GrayImageU8::from_fn(16, 16, |x, _| if x < 8 { 40 } else { 210 });
        let out = otsu(&img).unwrap();
        assert_eq!(out.get(0, 0), 0);
        assert_eq!(out.get(15, 15), 255);
        let whites = out.pixels().iter().filter(|&&v| v == 255).count();
        assert_eq!(whites, 128);
    }
}
