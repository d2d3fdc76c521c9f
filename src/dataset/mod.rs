//! Dataset assembly and sample access.
//!
//! - `DatasetConfig`: construction parameters
//! - `BlenderDataset`: builds rays + colors for one split, then serves samples
//! - `Sample`: a single ray (flattened layout) or a whole frame (stacked layout)

mod blender;
mod config;
mod sample;

pub use blender::{select_frames, BlenderDataset, DatasetError};
pub use config::{ComputeBackend, ConfigError, DatasetConfig, Layout};
pub use sample::{FrameSample, FrameSamples, RaySample, Sample, Samples};
