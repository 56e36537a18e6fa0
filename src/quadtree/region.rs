use crate::image::{ImageU8, ImageView};
use serde::Serialize;

/// Half-open rectangle `[row_start, row_end) × [col_start, col_end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl Region {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        debug_assert!(row_end > row_start && col_end > col_start);
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// Region covering a whole `width × height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, height, 0, width)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.row_end - self.row_start
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.col_end - self.col_start
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.height() * self.width()
    }

    /// Split at `h / 2`, `w / 2`. Bottom and right quadrants absorb the odd
    /// row/column. Order: top-left, top-right, bottom-left, bottom-right.
    ///
    /// Requires `height() >= 2 && width() >= 2`.
    pub fn quadrants(&self) -> [Region; 4] {
        debug_assert!(self.height() >= 2 && self.width() >= 2);
        let rm = self.row_start + self.height() / 2;
        let cm = self.col_start + self.width() / 2;
        [
            Region::new(self.row_start, rm, self.col_start, cm),
            Region::new(self.row_start, rm, cm, self.col_end),
            Region::new(rm, self.row_end, self.col_start, cm),
            Region::new(rm, self.row_end, cm, self.col_end),
        ]
    }
}

/// Intensity statistics of one region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RegionStats {
    pub count: usize,
    pub sum: u64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl RegionStats {
    pub fn of(image: &ImageU8<'_>, region: &Region) -> Self {
        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for y in region.row_start..region.row_end {
            let row = &image.row(y)[region.col_start..region.col_end];
            for &v in row {
                let v = v as u64;
                sum += v;
                sum_sq += v * v;
            }
        }
        Self::from_sums(region.area(), sum, sum_sq)
    }

    /// Variance is formed as `(n·Σv² − (Σv)²) / n²` in integers, so a
    /// constant region reports exactly zero spread.
    fn from_sums(count: usize, sum: u64, sum_sq: u64) -> Self {
        let n = count as u128;
        let spread = n * sum_sq as u128 - (sum as u128) * (sum as u128);
        let nf = count as f64;
        let var = spread as f64 / (nf * nf);
        Self {
            count,
            sum,
            mean: sum as f64 / nf,
            std: var.sqrt(),
        }
    }

    /// Fill value for a leaf: the mean rounded to nearest (ties away from zero).
    #[inline]
    pub fn fill_value(&self) -> u8 {
        self.mean.round().clamp(0.0, 255.0) as u8
    }
}
