//! JSON configuration for the harness and the command-line tools.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a config
//! file only needs the keys it changes.
pub mod segment;
pub mod sweep;

pub use sweep::{FilterSweepConfig, HarnessConfig, ImageEntry, SegmentationSweepConfig};

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read and parse a JSON config file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse_config(path, &data)
}

pub(crate) fn parse_config<T: DeserializeOwned>(path: &Path, data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
