//! Synthetic Blender scenes written to a temp directory.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use serde_json::json;
use std::path::Path;

/// `camera_angle_x` of the stock nerf_synthetic scenes.
pub const LEGO_FOV: f64 = 0.6911112070083618;

pub struct SceneFrame {
    pub transform: [[f32; 4]; 4],
    pub image: RgbaImage,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Camera at `position`, axes aligned with the world.
pub fn translated(position: [f32; 3]) -> [[f32; 4]; 4] {
    [
        [1.0, 0.0, 0.0, position[0]],
        [0.0, 1.0, 0.0, position[1]],
        [0.0, 0.0, 1.0, position[2]],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Left half opaque `color`, right half fully transparent.
pub fn half_transparent(size: u32, color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, _| {
        if x < size / 2 {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([color[0], color[1], color[2], 0])
        }
    })
}

pub fn solid(size: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(size, size, Rgba(rgba))
}

/// Write `transforms_<split>.json` and `<split>/r_<i>.png` under `root`.
pub fn write_scene(root: &Path, split: &str, camera_angle_x: f64, frames: &[SceneFrame]) {
    std::fs::create_dir_all(root.join(split)).unwrap();

    let mut records = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let rel = format!("./{split}/r_{i}");
        frame.image.save(root.join(format!("{rel}.png"))).unwrap();
        records.push(json!({
            "file_path": rel,
            "rotation": 0.012566370614359171,
            "transform_matrix": frame.transform,
        }));
    }

    let manifest = json!({
        "camera_angle_x": camera_angle_x,
        "frames": records,
    });
    std::fs::write(
        root.join(format!("transforms_{split}.json")),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

/// `n` frames of `size`×`size` solid images, camera i at (i, 0, 4).
pub fn write_line_of_frames(root: &Path, split: &str, n: usize, size: u32) {
    let frames: Vec<SceneFrame> = (0..n)
        .map(|i| SceneFrame {
            transform: translated([i as f32, 0.0, 4.0]),
            image: solid(size, [(i % 256) as u8, 0, 0, 255]),
        })
        .collect();
    write_scene(root, split, LEGO_FOV, &frames);
}
