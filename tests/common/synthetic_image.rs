use quadseg::image::GrayImageU8;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> GrayImageU8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");
    GrayImageU8::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) & 1 == 0 {
            32
        } else {
            220
        }
    })
}

/// Top-left `dark_w × dark_h` block at `dark`, everything else at `light`.
pub fn corner_block(
    width: usize,
    height: usize,
    dark_w: usize,
    dark_h: usize,
    dark: u8,
    light: u8,
) -> GrayImageU8 {
    GrayImageU8::from_fn(width, height, |x, y| {
        if x < dark_w && y < dark_h {
            dark
        } else {
            light
        }
    })
}

/// Horizontal intensity ramp from 0 at the left edge to 255 at the right.
pub fn ramp(width: usize, height: usize) -> GrayImageU8 {
    let denom = width.saturating_sub(1).max(1);
    GrayImageU8::from_fn(width, height, |x, _| ((x * 255) / denom) as u8)
}

/// Stand-ins for the low/medium/high-detail inputs of the sweep: a smooth
/// disc, a few blocks, and a dense checkerboard with a gradient.
pub fn detail_set(size: usize) -> Vec<(String, GrayImageU8)> {
    let c = size as f32 / 2.0;
    let low = GrayImageU8::from_fn(size, size, |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        if d < c * 0.6 {
            180
        } else {
            60
        }
    });
    let medium = GrayImageU8::from_fn(size, size, |x, y| match (x * 3 / size, y * 3 / size) {
        (0, _) => 40,
        (1, 1) => 200,
        (2, 0) => 140,
        _ => 100,
    });
    let high = GrayImageU8::from_fn(size, size, |x, y| {
        let base = if ((x / 4) + (y / 4)) % 2 == 0 { 30 } else { 190 };
        (base + (x * 60) / size) as u8
    });
    vec![
        ("low_detail".to_string(), low),
        ("medium_detail".to_string(), medium),
        ("high_detail".to_string(), high),
    ]
}
