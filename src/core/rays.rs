//! Per-pixel ray generation for a pinhole camera.
//!
//! Two steps:
//! 1. `view_directions`: pixel grid → camera-space directions (shared by every
//!    frame, since all frames share intrinsics)
//! 2. `rays_to_world`: camera-space directions + pose → world-space rays
//!
//! Directions are deliberately left unnormalised. Their z component is -1,
//! so distances along a ray are measured in camera depth, which is what the
//! near/far parameterisation downstream expects.

use crate::core::{CameraPose, PixelGrid};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// 2/√12: standard deviation of a unit-width uniform pixel footprint, times two.
pub const FOOTPRINT_SCALE: f32 = 0.577_350_27;

/// A world-space ray through one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Camera center (identical for every pixel of a frame)
    pub origin: Vector3<f32>,

    /// Unnormalised world-space direction
    pub direction: Vector3<f32>,

    /// Cone width proxy derived from the spacing to the neighbouring pixel's ray
    pub footprint: f32,
}

impl Ray {
    /// Packed 9-wide training record: origin.xyz, direction.xyz, then the
    /// footprint broadcast over the last three slots.
    pub fn to_array(&self) -> [f32; 9] {
        let f = self.footprint;
        [
            self.origin.x,
            self.origin.y,
            self.origin.z,
            self.direction.x,
            self.direction.y,
            self.direction.z,
            f,
            f,
            f,
        ]
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Camera-space view direction of every pixel.
///
/// For pixel (row i, col j):
///
/// ```text
/// d = ((j - W/2 + 0.5) / f, -(i - H/2 + 0.5) / f, -1)
/// ```
///
/// The camera looks down -Z; rows grow downward in the image so Y is flipped.
/// The same `focal` is used on both axes.
pub fn view_directions(height: u32, width: u32, focal: f32) -> PixelGrid<Vector3<f32>> {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    PixelGrid::from_fn(width, height, |row, col| {
        Vector3::new(
            (col as f32 - half_w + 0.5) / focal,
            -(row as f32 - half_h + 0.5) / focal,
            -1.0,
        )
    })
}

/// Transform camera-space directions into world-space rays.
///
/// Directions are rotated by the pose (no translation); every origin is the
/// pose translation. The footprint of pixel (i, j) is
/// `|d(i, j+1) - d(i, j)| * 2/√12`, with the last column reusing the
/// difference of the previous pair. Output has the shape of `directions`.
pub fn rays_to_world(directions: &PixelGrid<Vector3<f32>>, pose: &CameraPose) -> PixelGrid<Ray> {
    let rotation = pose.rotation();
    let origin = pose.translation();
    let world = directions.map(|d| rotation * *d);
    let width = world.width();

    PixelGrid::from_fn(width, world.height(), |row, col| {
        let direction = world.get(row, col).copied().unwrap_or_else(Vector3::zeros);
        let footprint = if width < 2 {
            0.0
        } else {
            let j = col.min(width - 2);
            match (world.get(row, j), world.get(row, j + 1)) {
                (Some(a), Some(b)) => (b - a).norm() * FOOTPRINT_SCALE,
                _ => 0.0,
            }
        };
        Ray {
            origin,
            direction,
            footprint,
        }
    })
}
