//! Camera intrinsics for Blender synthetic scenes.
//!
//! Every frame of a Blender dataset shares one pinhole camera. Its focal
//! length is derived once from the horizontal field of view stored in the
//! manifest, against the fixed 800×800 reference render size, then rescaled
//! to the requested training resolution.

use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Side length (pixels) of the renders shipped with Blender synthetic scenes.
pub const REFERENCE_RESOLUTION: u32 = 800;

/// Shared pinhole intrinsics.
///
/// A single focal length is used for both axes. For non-square resolutions
/// this is a known simplification: the vertical focal length is NOT derived
/// separately from the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length in pixels (x and y)
    pub focal: f32,

    /// Principal point X (pixels)
    pub cx: f32,

    /// Principal point Y (pixels)
    pub cy: f32,

    /// Image width (pixels)
    pub width: u32,

    /// Image height (pixels)
    pub height: u32,
}

impl CameraIntrinsics {
    pub fn new(focal: f32, width: u32, height: u32) -> Self {
        Self {
            focal,
            cx: width as f32 / 2.0,
            cy: height as f32 / 2.0,
            width,
            height,
        }
    }

    /// Derive intrinsics from the manifest's horizontal field of view.
    ///
    /// f = 0.5 * 800 / tan(0.5 * camera_angle_x), scaled by width / 800.
    pub fn from_fov(camera_angle_x: f64, width: u32, height: u32) -> Self {
        let reference = REFERENCE_RESOLUTION as f64;
        let focal = 0.5 * reference / (0.5 * camera_angle_x).tan();
        let focal = focal * width as f64 / reference;
        Self::new(focal as f32, width, height)
    }

    /// Training resolution for a downsample factor: (800 / d, 800 / d), truncated.
    pub fn downsampled_size(downsample: f32) -> (u32, u32) {
        let side = (REFERENCE_RESOLUTION as f32 / downsample) as u32;
        (side, side)
    }

    /// The 3×3 calibration matrix K.
    ///
    /// ```text
    /// K = | f  0  cx |
    ///     | 0  f  cy |
    ///     | 0  0  1  |
    /// ```
    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new(
            self.focal, 0.0, self.cx, //
            0.0, self.focal, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Project a point in camera coordinates (z forward) to pixel coordinates.
    ///
    /// Returns None if the point is behind the camera (z <= 0).
    pub fn project(&self, point_camera: &Vector3<f32>) -> Option<Vector2<f32>> {
        if point_camera.z <= 0.0 {
            return None;
        }
        let u = self.focal * point_camera.x / point_camera.z + self.cx;
        let v = self.focal * point_camera.y / point_camera.z + self.cy;
        Some(Vector2::new(u, v))
    }
}
