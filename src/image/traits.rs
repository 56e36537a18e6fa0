/// Read-only access to a row-major single-channel image.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// `(width, height)`, the order used by shape errors.
    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}

/// Fail with `ShapeMismatch` unless both images have the same `(w, h)`.
pub fn ensure_same_shape<A, B>(expected: &A, actual: &B) -> crate::Result<()>
where
    A: ImageView + ?Sized,
    B: ImageView + ?Sized,
{
    if expected.dims() != actual.dims() {
        return Err(crate::Error::ShapeMismatch {
            expected: expected.dims(),
            actual: actual.dims(),
        });
    }
    Ok(())
}
