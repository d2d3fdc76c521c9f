//! Per-index sample records handed to the training loop.

use crate::core::{PixelGrid, Ray};
use nalgebra::Vector3;

/// One pixel's supervision: its ray and ground-truth color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySample {
    pub ray: Ray,
    pub rgb: Vector3<f32>,
}

/// A whole frame, borrowed from the dataset.
#[derive(Clone, Copy, Debug)]
pub struct FrameSample<'a> {
    pub rays: &'a PixelGrid<Ray>,
    pub rgbs: &'a PixelGrid<Vector3<f32>>,

    /// Blender scenes provide no validity masks, so this is always `None`;
    /// treat every pixel as valid.
    pub mask: Option<&'a PixelGrid<bool>>,
}

/// Result of indexing a dataset; the variant follows its `Layout`.
#[derive(Clone, Copy, Debug)]
pub enum Sample<'a> {
    Ray(RaySample),
    Frame(FrameSample<'a>),
}

impl<'a> Sample<'a> {
    pub fn as_ray(&self) -> Option<&RaySample> {
        match self {
            Sample::Ray(s) => Some(s),
            Sample::Frame(_) => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameSample<'a>> {
        match self {
            Sample::Frame(s) => Some(s),
            Sample::Ray(_) => None,
        }
    }
}

/// Per-frame buffers kept by the stacked layout.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSamples {
    pub rays: PixelGrid<Ray>,
    pub rgbs: PixelGrid<Vector3<f32>>,
}

/// Every sample the dataset owns, in one of the two layouts.
#[derive(Clone, Debug, PartialEq)]
pub enum Samples {
    /// All pixels of frame 0, then all pixels of frame 1, ...
    Flattened {
        rays: Vec<Ray>,
        rgbs: Vec<Vector3<f32>>,
    },

    /// One entry per frame, in frame order
    Stacked(Vec<FrameSamples>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Flattened { rgbs, .. } => rgbs.len(),
            Samples::Stacked(frames) => frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` when `index` is out of range.
    pub fn get(&self, index: usize) -> Option<Sample<'_>> {
        match self {
            Samples::Flattened { rays, rgbs } => {
                let ray = *rays.get(index)?;
                let rgb = *rgbs.get(index)?;
                Some(Sample::Ray(RaySample { ray, rgb }))
            }
            Samples::Stacked(frames) => frames.get(index).map(|f| {
                Sample::Frame(FrameSample {
                    rays: &f.rays,
                    rgbs: &f.rgbs,
                    mask: None,
                })
            }),
        }
    }
}
