use crate::image::GrayImageU8;

/// Bilateral smoothing via `imageproc`; `diameter` is the window size.
pub fn bilateral(image: &GrayImageU8, diameter: u32, sigma_color: f32, sigma_space: f32) -> GrayImageU8 {
    let gray = image.to_gray_image();
    let out = imageproc::filter::bilateral_filter(&gray, diameter, sigma_color, sigma_space);
    GrayImageU8::from_gray_image(out)
}
