//! Construction parameters for a Blender dataset.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors in a dataset configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("downsample must be positive and at most 800, got {0}")]
    InvalidDownsample(f32),

    #[error("eval_limit must be at least 1 (omit it to load every frame)")]
    ZeroEvalLimit,

    #[error("near/far range must satisfy 0 <= near < far, got [{near}, {far}]")]
    InvalidNearFar { near: f32, far: f32 },

    #[error("split name is empty")]
    EmptySplit,
}

/// How samples are organised after loading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Every pixel of every frame in one sequence (training)
    #[default]
    Flattened,

    /// One H×W grid per frame (evaluation)
    Stacked,
}

/// Where per-frame work runs during construction.
///
/// Frames are independent given the shared intrinsics, so `Parallel` loads
/// them on the rayon pool. Results are identical and in the same order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeBackend {
    #[default]
    Serial,
    Parallel,
}

/// Dataset configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Scene directory containing `transforms_<split>.json`
    pub data_dir: PathBuf,

    /// Split name (train, val, test, ...)
    pub split: String,

    /// Resolution divisor relative to the 800×800 reference renders
    pub downsample: f32,

    pub layout: Layout,

    /// Load roughly this many frames by stride sampling; `None` loads all
    pub eval_limit: Option<usize>,

    /// `[min_x, min_y, min_z, max_x, max_y, max_z]`
    pub scene_bbox: [f32; 6],

    /// Sampling depth range along each ray
    pub near_far: [f32; 2],

    pub backend: ComputeBackend,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            split: "train".to_string(),
            downsample: 1.0,
            layout: Layout::Flattened,
            eval_limit: None,
            scene_bbox: [-30.0, -30.0, -30.0, 30.0, 30.0, 30.0],
            near_far: [0.2, 30.0],
            backend: ComputeBackend::Serial,
        }
    }
}

impl DatasetConfig {
    pub fn new(data_dir: impl Into<PathBuf>, split: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            split: split.into(),
            ..Self::default()
        }
    }

    pub fn with_downsample(mut self, downsample: f32) -> Self {
        self.downsample = downsample;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_eval_limit(mut self, limit: Option<usize>) -> Self {
        self.eval_limit = limit;
        self
    }

    pub fn with_scene_bbox(mut self, bbox: [f32; 6]) -> Self {
        self.scene_bbox = bbox;
        self
    }

    pub fn with_near_far(mut self, near: f32, far: f32) -> Self {
        self.near_far = [near, far];
        self
    }

    pub fn with_backend(mut self, backend: ComputeBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Read a JSON config document. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check parameter ranges before any file is touched.
    ///
    /// The bounding box is checked separately when `SceneBounds` is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split.is_empty() {
            return Err(ConfigError::EmptySplit);
        }
        // also rejects NaN
        if !(self.downsample > 0.0 && self.downsample <= 800.0) {
            return Err(ConfigError::InvalidDownsample(self.downsample));
        }
        if self.eval_limit == Some(0) {
            return Err(ConfigError::ZeroEvalLimit);
        }
        let [near, far] = self.near_far;
        if !(near >= 0.0 && near < far) {
            return Err(ConfigError::InvalidNearFar { near, far });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DatasetConfig::new("/data/lego", "test");
        assert_eq!(cfg.split, "test");
        assert_eq!(cfg.downsample, 1.0);
        assert_eq!(cfg.layout, Layout::Flattened);
        assert_eq!(cfg.eval_limit, None);
        assert_eq!(cfg.scene_bbox, [-30.0, -30.0, -30.0, 30.0, 30.0, 30.0]);
        assert_eq!(cfg.near_far, [0.2, 30.0]);
        assert_eq!(cfg.backend, ComputeBackend::Serial);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/scenes/chair", "split": "val", "layout": "stacked",
                "eval_limit": 8, "backend": "parallel"}"#,
        )
        .unwrap();

        let cfg = DatasetConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/scenes/chair"));
        assert_eq!(cfg.split, "val");
        assert_eq!(cfg.layout, Layout::Stacked);
        assert_eq!(cfg.eval_limit, Some(8));
        assert_eq!(cfg.backend, ComputeBackend::Parallel);
        assert_eq!(cfg.downsample, 1.0);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"layout": "diagonal"}"#).unwrap();
        assert!(matches!(
            DatasetConfig::from_json_file(&path),
            Err(ConfigError::Json { .. })
        ));
        assert!(matches!(
            DatasetConfig::from_json_file(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_validate_ranges() {
        let base = DatasetConfig::new(".", "train");
        assert!(matches!(
            base.clone().with_downsample(0.0).validate(),
            Err(ConfigError::InvalidDownsample(_))
        ));
        assert!(matches!(
            base.clone().with_downsample(f32::NAN).validate(),
            Err(ConfigError::InvalidDownsample(_))
        ));
        assert!(matches!(
            base.clone().with_eval_limit(Some(0)).validate(),
            Err(ConfigError::ZeroEvalLimit)
        ));
        assert!(matches!(
            base.clone().with_near_far(2.0, 1.0).validate(),
            Err(ConfigError::InvalidNearFar { .. })
        ));
        assert!(matches!(
            DatasetConfig::new(".", "").validate(),
            Err(ConfigError::EmptySplit)
        ));
        base.with_downsample(4.0).with_eval_limit(Some(10)).validate().unwrap();
    }
}
