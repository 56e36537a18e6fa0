//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_image`: read a PNG/JPEG into an owned 8-bit gray buffer.
//! - `save_grayscale_u8`: write an owned 8-bit gray buffer to a PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::GrayImageU8;
use crate::{Error, Result};
use image::ImageError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
///
/// A missing file is reported as `Error::NotFound`; anything the decoder
/// rejects becomes `Error::Decode`.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let img = image::open(path)
        .map_err(|e| match e {
            ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                Error::NotFound(path.to_path_buf())
            }
            ImageError::IoError(io) => Error::Io {
                path: path.to_path_buf(),
                source: io,
            },
            other => Error::Decode {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?
        .into_luma8();
    Ok(GrayImageU8::from_gray_image(img))
}

/// Save an 8-bit grayscale buffer to disk. The format follows the extension;
/// callers in this crate always use `.png` (lossless).
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    buffer
        .to_gray_image()
        .save(path)
        .map_err(|e| Error::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })
}
