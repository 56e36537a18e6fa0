use crate::image::GrayImageU8;
use serde::{Deserialize, Serialize};

/// Basic statistics of a source image, reported alongside sweep results.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub mean_intensity: f32,
}

impl ImageDescriptor {
    pub fn from_image(name: impl Into<String>, image: &GrayImageU8) -> Self {
        let sum: u64 = image.pixels().iter().map(|&v| v as u64).sum();
        let denom = image.len().max(1) as f32;
        Self {
            name: name.into(),
            width: image.width(),
            height: image.height(),
            mean_intensity: sum as f32 / denom,
        }
    }
}
