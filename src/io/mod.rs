//! I/O for Blender synthetic datasets.
//!
//! This module handles the file formats a scene directory contains:
//! - `transforms_<split>.json` manifests (camera FOV + per-frame poses)
//! - RGBA PNG renders
//! - PFM depth maps (`depth` feature)

mod image;
mod manifest;
#[cfg(feature = "depth")]
mod pfm;

// Re-export public types and functions
pub use self::image::{load_rgba, rgba_pixels, ImageError};
pub use manifest::{load_manifest, manifest_path, FrameRecord, Manifest, ManifestError};
#[cfg(feature = "depth")]
pub use pfm::{parse_pfm, read_pfm, FloatMap, PfmError};
