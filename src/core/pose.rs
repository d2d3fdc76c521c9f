//! Camera-to-world poses.

use nalgebra::{Matrix3, Matrix3x4, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Sign flip applied on the right of every manifest pose.
///
/// Negates the camera's first two axes; the translation column is untouched.
pub fn blender_to_opencv() -> Matrix4<f32> {
    Matrix4::from_diagonal(&nalgebra::Vector4::new(-1.0, -1.0, 1.0, 1.0))
}

/// A rigid camera-to-world transform, already converted to the dataset's
/// working convention.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    c2w: Matrix4<f32>,
}

impl CameraPose {
    /// Wrap a camera-to-world matrix as-is.
    pub fn new(c2w: Matrix4<f32>) -> Self {
        Self { c2w }
    }

    /// Convert a raw manifest `transform_matrix` (Blender convention).
    pub fn from_blender(transform: &Matrix4<f32>) -> Self {
        Self::new(transform * blender_to_opencv())
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.c2w
    }

    /// Upper-left 3×3 block: camera axes expressed in world space.
    pub fn rotation(&self) -> Matrix3<f32> {
        self.c2w.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Camera center in world coordinates.
    pub fn translation(&self) -> Vector3<f32> {
        self.c2w.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Top three rows of the world-to-camera transform.
    ///
    /// The inversion runs in f64. Returns None for a singular matrix.
    pub fn world_to_camera(&self) -> Option<Matrix3x4<f32>> {
        let inverse = self.c2w.cast::<f64>().try_inverse()?;
        Some(inverse.fixed_view::<3, 4>(0, 0).into_owned().cast::<f32>())
    }
}
