//! Core data structures and geometry.
//!
//! This module contains the pure parts of the pipeline:
//! - `CameraIntrinsics`: shared pinhole camera derived from the field of view
//! - `CameraPose`: camera-to-world transforms in the working convention
//! - `rays`: per-pixel view directions and world-space rays
//! - `projection`: world-to-image projection matrices
//! - `SceneBounds`: bounding box normalisation
//! - `color`: alpha compositing onto the white background
//!
//! All types here are "pure data" - no I/O.

mod bounds;
mod camera;
pub mod color;
mod grid;
mod pose;
pub mod projection;
pub mod rays;

// Re-export public types
pub use bounds::SceneBounds;
pub use camera::{CameraIntrinsics, REFERENCE_RESOLUTION};
pub use grid::{PixelGrid, ShapeError};
pub use pose::{blender_to_opencv, CameraPose};
pub use projection::{build_projection_matrices, GeometryError, ProjectionMatrix};
pub use rays::{rays_to_world, view_directions, Ray};
