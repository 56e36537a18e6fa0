use crate::image::GrayImageU8;

/// Median over an odd `window × window` neighbourhood.
pub fn median(image: &GrayImageU8, window: u32) -> GrayImageU8 {
    let radius = window / 2;
    let gray = image.to_gray_image();
    GrayImageU8::from_gray_image(imageproc::filter::median_filter(&gray, radius, radius))
}
