//! RGBA image loading.
//!
//! Blender renders are 8-bit RGBA PNGs. Pixels come back as floats in
//! [0, 1] (channel value / channel max) with no color-space conversion,
//! laid out row-major.
//!
//! Resizing filters premultiplied color. Transparent pixels in a render
//! usually hold RGB = 0, and a straight-alpha filter would bleed that black
//! into the silhouette.

use crate::core::PixelGrid;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, Rgba32FImage};
use nalgebra::Vector4;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a frame image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("expected an RGBA image, found {0:?}")]
    MissingAlpha(ColorType),
}

/// Open `path` as RGBA, resizing to `size` = (width, height) when given and
/// different from the decoded size.
pub fn load_rgba(path: &Path, size: Option<(u32, u32)>) -> Result<PixelGrid<Vector4<f32>>, ImageError> {
    let img = image::open(path)?;
    rgba_pixels(img, size)
}

/// Convert an already-decoded image. Split out so tests can skip the filesystem.
pub fn rgba_pixels(
    img: DynamicImage,
    size: Option<(u32, u32)>,
) -> Result<PixelGrid<Vector4<f32>>, ImageError> {
    let color = img.color();
    if !color.has_alpha() || color.channel_count() != 4 {
        return Err(ImageError::MissingAlpha(color));
    }

    let rgba = img.to_rgba32f();
    let rgba = match size {
        Some((w, h)) if (w, h) != rgba.dimensions() => {
            let (src_w, src_h) = rgba.dimensions();
            // u64 cross-multiplication: aspect ratios differ iff w*H != h*W
            if w as u64 * src_h as u64 != h as u64 * src_w as u64 {
                log::warn!(
                    "aspect ratio changes when resizing {}x{} to {}x{}; focal length is shared by both axes",
                    src_w,
                    src_h,
                    w,
                    h
                );
            }
            log::debug!("resizing {}x{} -> {}x{} (lanczos)", src_w, src_h, w, h);
            resize_premultiplied(rgba, w, h)
        }
        _ => rgba,
    };

    let (width, height) = rgba.dimensions();
    Ok(PixelGrid::from_fn(width, height, |row, col| {
        let p = rgba.get_pixel(col, row);
        Vector4::new(p[0], p[1], p[2], p[3])
    }))
}

/// Lanczos3 resize of straight-alpha RGBA, filtering in premultiplied space.
fn resize_premultiplied(mut img: Rgba32FImage, width: u32, height: u32) -> Rgba32FImage {
    for p in img.pixels_mut() {
        let a = p[3];
        p[0] *= a;
        p[1] *= a;
        p[2] *= a;
    }

    let mut out = imageops::resize(&img, width, height, FilterType::Lanczos3);
    for p in out.pixels_mut() {
        let a = p[3];
        // fully transparent: color is irrelevant once composited
        let inv = if a > 0.0 { 1.0 / a } else { 0.0 };
        p[0] = (p[0] * inv).clamp(0.0, 1.0);
        p[1] = (p[1] * inv).clamp(0.0, 1.0);
        p[2] = (p[2] * inv).clamp(0.0, 1.0);
        p[3] = a.clamp(0.0, 1.0);
    }
    out
}
