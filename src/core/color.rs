//! Alpha compositing of RGBA renders onto a solid background.
//!
//! Blender synthetic scenes are rendered with a transparent background. The
//! supervision signal is the render composited onto white:
//!
//! ```text
//! rgb_out = rgb * alpha + background * (1 - alpha)
//! ```
//!
//! Channel values are in [0, 1] and are NOT linearised; they are the raw
//! 8-bit (or 16-bit) values divided by the channel maximum.

use crate::core::PixelGrid;
use nalgebra::{Vector3, Vector4};

/// Background fill used for every Blender scene.
pub fn white() -> Vector3<f32> {
    Vector3::repeat(1.0)
}

/// Composite a single RGBA pixel onto `background`.
///
/// # Example
/// use nalgebra::{Vector3, Vector4};
/// use nalgebra::Vector4;
/// use nerf_rays::core::color::{composite_over, white};
///
/// let half_red = Vector4::new(1.0, 0.0, 0.0, 0.5);
/// let out = composite_over(&half_red, &white());
/// assert_eq!(out, Vector3::new(1.0, 0.5, 0.5));
/// ```
pub fn composite_over(rgba: &Vector4<f32>, background: &Vector3<f32>) -> Vector3<f32> {
    let alpha = rgba.w;
    rgba.xyz() * alpha + background * (1.0 - alpha)
}

/// Composite every pixel of an RGBA grid onto white.
///
/// The alpha channel is consumed here and never stored downstream.
pub fn composite_on_white(pixels: &PixelGrid<Vector4<f32>>) -> PixelGrid<Vector3<f32>> {
    let bg = white();
    pixels.map(|p| composite_over(p, &bg))
}
