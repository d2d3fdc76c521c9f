//! # nerf-rays: NeRF training rays from Blender synthetic scenes
//!
//! This crate turns a Blender-style synthetic dataset (RGBA renders plus a
//! `transforms_<split>.json` manifest of camera poses and field of view) into
//! per-pixel rays and ground-truth colors for radiance-field optimisation.
//!
//! ## Architecture
//!
//! The crate is organized into three modules:
//!
//! - `core`: Pure geometry (intrinsics, poses, ray generation, projection
//!   matrices, scene bounds, alpha compositing)
//! - `io`: File formats (manifest JSON, RGBA PNG, PFM depth behind `depth`)
//! - `dataset`: One-shot assembly into a read-only dataset with random access
//!
//! ## Example
//!
//! ```no_run
//! use nerf_rays::{BlenderDataset, DatasetConfig, Layout};
//!
//! let config = DatasetConfig::new("data/nerf_synthetic/lego", "train")
//!     .with_downsample(2.0)
//!     .with_layout(Layout::Flattened);
//! let dataset = BlenderDataset::load(&config)?;
//!
//! let sample = dataset.get(0)?;
//! let ray = sample.as_ray().expect("flattened layout yields rays");
//! println!("{:?} -> {:?}", ray.ray.to_array(), ray.rgb);
//! # Ok::<(), nerf_rays::DatasetError>(())
//! ```

// Core data structures and geometry
pub mod core;

// I/O operations (manifest, images, depth)
pub mod io;

// Dataset assembly and sample access
pub mod dataset;

// Re-export commonly used types at crate root for convenience
pub use crate::core::{CameraIntrinsics, CameraPose, ProjectionMatrix, Ray, SceneBounds};
pub use dataset::{
    BlenderDataset, ComputeBackend, DatasetConfig, DatasetError, Layout, Sample,
};
pub use io::{ImageError, ManifestError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
