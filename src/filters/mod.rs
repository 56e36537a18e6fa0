//! Edge-preserving smoothing stage.
//!
//! Filters are selected by the closed [`FilterKind`] enum. Kernel sizes map
//! to concrete parameters as follows:
//!
//! | kind      | kernel 5            | any other kernel       |
//! |-----------|---------------------|------------------------|
//! | bilateral | d 5, σ 50 / 50      | d 15, σ 100 / 100      |
//! | median    | window = kernel     | window = kernel (odd)  |
//! | guided    | r 2, ε 0.4          | r 8, ε 0.4             |
//!
//! [`apply_filter`] never fails: an unsupported size returns the input
//! unchanged and says so in [`FilterOutput::provenance`].
mod bilateral;
mod guided;
mod median;

pub use bilateral::bilateral;
pub use guided::guided;
pub use median::median;

use crate::image::GrayImageU8;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Bilateral,
    Median,
    Guided,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Bilateral, FilterKind::Median, FilterKind::Guided];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Bilateral => "bilateral",
            FilterKind::Median => "median",
            FilterKind::Guided => "guided",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete parameters chosen for a `(kind, kernel_size)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterSettings {
    Bilateral {
        diameter: u32,
        sigma_color: f32,
        sigma_space: f32,
    },
    Median {
        window: u32,
    },
    Guided {
        radius: u32,
        eps: f32,
    },
}

impl FilterSettings {
    /// Resolve parameters, or explain why the size is unsupported.
    pub fn resolve(kind: FilterKind, kernel_size: u32) -> Result<Self, String> {
        if kernel_size == 0 {
            return Err(format!("{kind}: kernel size must be positive"));
        }
        Ok(match kind {
            FilterKind::Bilateral if kernel_size == 5 => FilterSettings::Bilateral {
                diameter: 5,
                sigma_color: 50.0,
                sigma_space: 50.0,
            },
            FilterKind::Bilateral => FilterSettings::Bilateral {
                diameter: 15,
                sigma_color: 100.0,
                sigma_space: 100.0,
            },
            FilterKind::Median => {
                if kernel_size % 2 == 0 {
                    return Err(format!("median: kernel size must be odd, got {kernel_size}"));
                }
                FilterSettings::Median {
                    window: kernel_size,
                }
            }
            FilterKind::Guided if kernel_size == 5 => FilterSettings::Guided {
                radius: 2,
                eps: 0.4,
            },
            FilterKind::Guided => FilterSettings::Guided {
                radius: 8,
                eps: 0.4,
            },
        })
    }

    pub fn apply(&self, image: &GrayImageU8) -> GrayImageU8 {
        match *self {
            FilterSettings::Bilateral {
                diameter,
                sigma_color,
                sigma_space,
            } => bilateral(image, diameter, sigma_color, sigma_space),
            FilterSettings::Median { window } => median(image, window),
            FilterSettings::Guided { radius, eps } => guided(image, image, radius, eps),
        }
    }
}

/// Where a filter output came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Provenance {
    Filtered { settings: FilterSettings },
    /// The filter could not run; the image is the unfiltered input.
    Fallback { reason: String },
}

#[derive(Clone, Debug)]
pub struct FilterOutput {
    pub image: GrayImageU8,
    pub provenance: Provenance,
}

impl FilterOutput {
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback { .. })
    }
}

/// Smooth `image` with `kind` at `kernel_size`, falling back to identity.
pub fn apply_filter(image: &GrayImageU8, kind: FilterKind, kernel_size: u32) -> FilterOutput {
    if image.is_empty() {
        return fallback(image, format!("{kind}: empty image"));
    }
    match FilterSettings::resolve(kind, kernel_size) {
        Ok(settings) => FilterOutput {
            image: settings.apply(image),
            provenance: Provenance::Filtered { settings },
        },
        Err(reason) => fallback(image, reason),
    }
}

fn fallback(image: &GrayImageU8, reason: String) -> FilterOutput {
    log::warn!("filter fallback to identity: {reason}");
    FilterOutput {
        image: image.clone(),
        provenance: Provenance::Fallback { reason },
    }
}
