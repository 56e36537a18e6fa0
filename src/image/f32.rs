//! Owned single-channel f32 buffer, row-major with `stride == width`.
//!
//! Working storage for the guided filter. Values stay on the 8-bit intensity
//! scale (0..=255) rather than being normalised to [0, 1].
use super::traits::{ImageView, ImageViewMut};
use super::GrayImageU8;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<f32>,
}

impl ImageF32 {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    /// Widen an 8-bit image without rescaling.
    pub fn from_u8(image: &GrayImageU8) -> Self {
        Self {
            w: image.width(),
            h: image.height(),
            data: image.pixels().iter().map(|&v| v as f32).collect(),
        }
    }

    /// Round to nearest and saturate into [0, 255].
    pub fn to_u8(&self) -> GrayImageU8 {
        GrayImageU8::from_fn(self.w, self.h, |x, y| {
            self.get(x, y).round().clamp(0.0, 255.0) as u8
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.w + x] = v;
    }

    /// Element-wise product, for second-moment images.
    pub fn mul(&self, other: &ImageF32) -> ImageF32 {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        ImageF32 {
            w: self.w,
            h: self.h,
            data: self.data.iter().zip(&other.data).map(|(a, b)| a * b).collect(),
        }
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.w..(y + 1) * self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let w = self.w;
        &mut self.data[y * w..(y + 1) * w]
    }
}
