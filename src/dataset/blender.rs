//! Blender synthetic dataset: manifest + RGBA renders → rays and colors.
//!
//! Construction is a single pass:
//! 1. load `transforms_<split>.json`
//! 2. derive the shared intrinsics and per-pixel view directions
//! 3. pick frames (all, or stride-sampled down to `eval_limit`)
//! 4. per frame: fix the pose convention, decode + composite the image,
//!    generate world-space rays
//! 5. concatenate (flattened) or reshape per frame (stacked)
//!
//! Any failure aborts construction. The finished dataset is read-only.

use crate::core::color::composite_on_white;
use crate::core::{
    build_projection_matrices, rays_to_world, view_directions, CameraIntrinsics, CameraPose,
    GeometryError, PixelGrid, ProjectionMatrix, Ray, SceneBounds,
};
use crate::dataset::config::{ComputeBackend, ConfigError, DatasetConfig, Layout};
use crate::dataset::sample::{FrameSamples, Sample, Samples};
use crate::io::{load_manifest, load_rgba, FrameRecord, ImageError, Manifest, ManifestError};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from building or indexing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to load image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("sample index {index} out of range for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Frame indices to load: every `total / limit`-th frame starting at 0, or
/// all frames when no limit is given.
///
/// Stride sampling keeps manifest order and can return more than `limit`
/// frames when `limit` does not divide `total`.
pub fn select_frames(total: usize, eval_limit: Option<usize>) -> Vec<usize> {
    let stride = match eval_limit {
        None => 1,
        Some(limit) => (total / limit.max(1)).max(1),
    };
    (0..total).step_by(stride).collect()
}

/// One frame's output before final assembly.
struct LoadedFrame {
    pose: CameraPose,
    image_path: PathBuf,
    rays: PixelGrid<Ray>,
    rgbs: PixelGrid<Vector3<f32>>,
}

fn load_frame(
    root: &Path,
    record: &FrameRecord,
    directions: &PixelGrid<Vector3<f32>>,
) -> Result<LoadedFrame, DatasetError> {
    let pose = CameraPose::from_blender(&record.transform());
    let image_path = record.image_path(root);

    let size = (directions.width(), directions.height());
    let rgba = load_rgba(&image_path, Some(size)).map_err(|source| DatasetError::Image {
        path: image_path.clone(),
        source,
    })?;
    let rgbs = composite_on_white(&rgba);
    let rays = rays_to_world(directions, &pose);

    Ok(LoadedFrame {
        pose,
        image_path,
        rays,
        rgbs,
    })
}

/// A loaded Blender scene split.
#[derive(Debug, Clone)]
pub struct BlenderDataset {
    split: String,
    img_wh: (u32, u32),
    downsample: f32,
    intrinsics: CameraIntrinsics,
    directions: PixelGrid<Vector3<f32>>,
    frame_indices: Vec<usize>,
    poses: Vec<CameraPose>,
    image_paths: Vec<PathBuf>,
    proj_mats: Vec<ProjectionMatrix>,
    scene_bbox: [f32; 6],
    near_far: [f32; 2],
    samples: Samples,
}

impl BlenderDataset {
    /// Load the split described by `config`.
    pub fn load(config: &DatasetConfig) -> Result<Self, DatasetError> {
        config.validate()?;
        let manifest = load_manifest(&config.data_dir, &config.split)?;
        Self::from_manifest(config, &manifest)
    }

    fn from_manifest(config: &DatasetConfig, manifest: &Manifest) -> Result<Self, DatasetError> {
        let (w, h) = CameraIntrinsics::downsampled_size(config.downsample);
        let intrinsics = CameraIntrinsics::from_fov(manifest.camera_angle_x, w, h);
        // identical for every frame: all frames share H, W and focal
        let directions = view_directions(h, w, intrinsics.focal);

        let frame_indices = select_frames(manifest.frames.len(), config.eval_limit);
        log::info!(
            "Loading data {} ({} of {} frames, {}x{}, focal {:.3})",
            config.split,
            frame_indices.len(),
            manifest.frames.len(),
            w,
            h,
            intrinsics.focal
        );

        let root = config.data_dir.as_path();
        let total = frame_indices.len();
        let load = |(n, &i): (usize, &usize)| {
            let record = &manifest.frames[i];
            log::debug!("[{}/{}] frame {} ({})", n + 1, total, i, record.file_path);
            load_frame(root, record, &directions)
        };
        let frames: Vec<LoadedFrame> = match config.backend {
            ComputeBackend::Serial => frame_indices
                .iter()
                .enumerate()
                .map(load)
                .collect::<Result<_, _>>()?,
            ComputeBackend::Parallel => frame_indices
                .par_iter()
                .enumerate()
                .map(load)
                .collect::<Result<_, _>>()?,
        };

        let mut poses = Vec::with_capacity(frames.len());
        let mut image_paths = Vec::with_capacity(frames.len());
        let mut per_frame = Vec::with_capacity(frames.len());
        for frame in frames {
            poses.push(frame.pose);
            image_paths.push(frame.image_path);
            per_frame.push((frame.rays, frame.rgbs));
        }

        let proj_mats = build_projection_matrices(&intrinsics, &poses)?;
        let samples = assemble(per_frame, config.layout);
        log::info!(
            "Loaded {} {} samples from {} frames",
            samples.len(),
            match config.layout {
                Layout::Flattened => "ray",
                Layout::Stacked => "frame",
            },
            poses.len()
        );

        Ok(Self {
            split: config.split.clone(),
            img_wh: (w, h),
            downsample: config.downsample,
            intrinsics,
            directions,
            frame_indices,
            poses,
            image_paths,
            proj_mats,
            scene_bbox: config.scene_bbox,
            near_far: config.near_far,
            samples,
        })
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    /// Training resolution (width, height).
    pub fn img_wh(&self) -> (u32, u32) {
        self.img_wh
    }

    pub fn downsample(&self) -> f32 {
        self.downsample
    }

    pub fn focal(&self) -> f32 {
        self.intrinsics.focal
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Camera-space view directions shared by every frame.
    pub fn directions(&self) -> &PixelGrid<Vector3<f32>> {
        &self.directions
    }

    /// Manifest indices of the loaded frames.
    pub fn frame_indices(&self) -> &[usize] {
        &self.frame_indices
    }

    /// Convention-corrected camera-to-world poses, one per loaded frame.
    pub fn poses(&self) -> &[CameraPose] {
        &self.poses
    }

    pub fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }

    pub fn proj_mats(&self) -> &[ProjectionMatrix] {
        &self.proj_mats
    }

    /// Configured box as `[min_x, min_y, min_z, max_x, max_y, max_z]`.
    pub fn scene_bbox(&self) -> [f32; 6] {
        self.scene_bbox
    }

    /// Bounds built from the configured box. Loading never uses them, so a
    /// degenerate box only fails here.
    pub fn scene_bounds(&self) -> Result<SceneBounds, GeometryError> {
        SceneBounds::from_array(self.scene_bbox)
    }

    pub fn near_far(&self) -> [f32; 2] {
        self.near_far
    }

    /// Colors are always composited onto white.
    pub fn white_bg(&self) -> bool {
        true
    }

    pub fn layout(&self) -> Layout {
        match self.samples {
            Samples::Flattened { .. } => Layout::Flattened,
            Samples::Stacked(_) => Layout::Stacked,
        }
    }

    /// Raw sample buffers, for batching layers that want whole slices.
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Number of addressable samples: pixels when flattened, frames when stacked.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`: a single ray + color (flattened) or a full frame (stacked).
    pub fn get(&self, index: usize) -> Result<Sample<'_>, DatasetError> {
        self.samples.get(index).ok_or(DatasetError::IndexOutOfBounds {
            index,
            len: self.len(),
        })
    }

    /// Map world points into the canonical cube of the scene bounds.
    pub fn world_to_ndc(&self, points: &[Vector3<f32>]) -> Result<Vec<Vector3<f32>>, GeometryError> {
        let bounds = self.scene_bounds()?;
        Ok(points.iter().map(|p| bounds.normalize(p)).collect())
    }
}

/// Final layout step. Frames arrive in selection order.
fn assemble(frames: Vec<(PixelGrid<Ray>, PixelGrid<Vector3<f32>>)>, layout: Layout) -> Samples {
    match layout {
        Layout::Flattened => {
            let total: usize = frames.iter().map(|(r, _)| r.len()).sum();
            let mut rays = Vec::with_capacity(total);
            let mut rgbs = Vec::with_capacity(total);
            for (frame_rays, frame_rgbs) in frames {
                rays.extend(frame_rays.into_flat());
                rgbs.extend(frame_rgbs.into_flat());
            }
            Samples::Flattened { rays, rgbs }
        }
        Layout::Stacked => Samples::Stacked(
            frames
                .into_iter()
                .map(|(rays, rgbs)| FrameSamples { rays, rgbs })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_selection_hundred_frames() {
        let idxs = select_frames(100, Some(10));
        assert_eq!(idxs, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn test_no_limit_selects_all_in_order() {
        assert_eq!(select_frames(5, None), vec![0, 1, 2, 3, 4]);
        assert!(select_frames(0, None).is_empty());
    }

    #[test]
    fn test_stride_can_overshoot_limit() {
        // 25 / 10 = stride 2 → 13 frames
        let idxs = select_frames(25, Some(10));
        assert_eq!(idxs.len(), 13);
        assert_eq!(idxs[0], 0);
        assert_eq!(*idxs.last().unwrap(), 24);
    }

    #[test]
    fn test_limit_above_total_selects_all() {
        assert_eq!(select_frames(3, Some(8)), vec![0, 1, 2]);
    }

    fn fake_frame(tag: f32) -> (PixelGrid<Ray>, PixelGrid<Vector3<f32>>) {
        let ray = Ray {
            origin: Vector3::new(tag, 0.0, 0.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
            footprint: 0.1,
        };
        let rays = PixelGrid::from_fn(3, 2, |_, _| ray);
        let rgbs = PixelGrid::from_fn(3, 2, |row, col| Vector3::new(tag, (row * 3 + col) as f32, 0.0));
        (rays, rgbs)
    }

    #[test]
    fn test_flattened_concatenates_frame_then_pixel() {
        let samples = assemble(vec![fake_frame(0.0), fake_frame(1.0)], Layout::Flattened);
        assert_eq!(samples.len(), 12);

        let s = samples.get(7).unwrap();
        let ray = s.as_ray().unwrap();
        assert_eq!(ray.rgb, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(ray.ray.origin.x, 1.0);
        assert!(samples.get(12).is_none());
    }

    #[test]
    fn test_stacked_keeps_each_frame_grid() {
        let samples = assemble(vec![fake_frame(0.0), fake_frame(1.0)], Layout::Stacked);
        assert_eq!(samples.len(), 2);

        let s = samples.get(1).unwrap();
        let frame = s.as_frame().unwrap();
        assert_eq!((frame.rgbs.width(), frame.rgbs.height()), (3, 2));
        // row 1, col 2 is flat pixel 5
        assert_eq!(frame.rgbs.get(1, 2), Some(&Vector3::new(1.0, 5.0, 0.0)));
        assert!(frame.mask.is_none());
    }
}
