//! World-to-image projection matrices.
//!
//! P = K · [R | t]_w2c, one 3×4 matrix per frame. Consumers use these for
//! visibility and reprojection checks against the training images.

use crate::core::{CameraIntrinsics, CameraPose};
use nalgebra::{Matrix3x4, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from geometric preconditions on the input data.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("camera pose for frame {frame} is not invertible")]
    SingularPose { frame: usize },

    #[error("scene bounding box is degenerate on axis {axis} (min {min} >= max {max})")]
    DegenerateBounds { axis: usize, min: f32, max: f32 },
}

/// A 3×4 matrix mapping homogeneous world points to homogeneous pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionMatrix(pub Matrix3x4<f32>);

impl ProjectionMatrix {
    /// Build `K · world_to_camera(pose)`.
    ///
    /// `frame` only labels the error.
    pub fn new(
        intrinsics: &CameraIntrinsics,
        pose: &CameraPose,
        frame: usize,
    ) -> Result<Self, GeometryError> {
        let w2c = pose
            .world_to_camera()
            .ok_or(GeometryError::SingularPose { frame })?;
        Ok(Self(intrinsics.matrix() * w2c))
    }

    pub fn matrix(&self) -> &Matrix3x4<f32> {
        &self.0
    }

    /// Project a world point to pixel coordinates.
    ///
    /// Returns None when the homogeneous depth is not positive.
    pub fn project(&self, point_world: &Vector3<f32>) -> Option<Vector2<f32>> {
        let p = self.0 * point_world.push(1.0);
        if p.z <= 0.0 {
            return None;
        }
        Some(Vector2::new(p.x / p.z, p.y / p.z))
    }
}

/// One projection matrix per pose, in pose order.
///
/// Fails on the first non-invertible pose.
pub fn build_projection_matrices(
    intrinsics: &CameraIntrinsics,
    poses: &[CameraPose],
) -> Result<Vec<ProjectionMatrix>, GeometryError> {
    poses
        .iter()
        .enumerate()
        .map(|(frame, pose)| ProjectionMatrix::new(intrinsics, pose, frame))
        .collect()
}
