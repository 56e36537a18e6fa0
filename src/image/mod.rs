//! Single-channel image containers and I/O.
//!
//! - `GrayImageU8`: owned 8-bit image, the value type passed between stages.
//! - `ImageU8`: borrowed 8-bit view with an explicit stride.
//! - `ImageF32`: owned float working buffer for the guided filter.
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::traits::{ensure_same_shape, ImageView, ImageViewMut, Rows};
pub use self::u8::{GrayImageU8, ImageU8};
