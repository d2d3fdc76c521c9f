//! Blender `transforms_<split>.json` manifests.
//!
//! ```json
//! {
//!   "camera_angle_x": 0.6911112070083618,
//!   "frames": [
//!     { "file_path": "./train/r_0", "transform_matrix": [[...4], [...4], [...4], [...4]] }
//!   ]
//! }
//! ```
//!
//! Unknown keys (`rotation`, ...) are ignored.

use nalgebra::Matrix4;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest has no frames")]
    NoFrames,

    #[error("invalid camera_angle_x: {0}")]
    InvalidFieldOfView(f64),

    #[error("frame {frame} has a non-finite transform_matrix")]
    NonFiniteTransform { frame: usize },
}

/// The parsed manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Horizontal field of view in radians
    pub camera_angle_x: f64,

    /// Frames in file order
    pub frames: Vec<FrameRecord>,
}

/// One frame entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    /// Image path relative to the dataset root, without extension
    pub file_path: String,

    /// Camera-to-world transform in Blender convention, row-major
    pub transform_matrix: [[f32; 4]; 4],
}

impl FrameRecord {
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_fn(|r, c| self.transform_matrix[r][c])
    }

    /// `<root>/<file_path>.png`
    pub fn image_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.png", self.file_path))
    }
}

impl Manifest {
    /// Parse a manifest from a JSON string. Does not validate.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Structural checks that would otherwise surface as NaN rays later on.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.frames.is_empty() {
            return Err(ManifestError::NoFrames);
        }
        let fov = self.camera_angle_x;
        if !(fov.is_finite() && fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(ManifestError::InvalidFieldOfView(fov));
        }
        for (frame, record) in self.frames.iter().enumerate() {
            if record.transform_matrix.iter().flatten().any(|v| !v.is_finite()) {
                return Err(ManifestError::NonFiniteTransform { frame });
            }
        }
        Ok(())
    }
}

/// Path of the manifest for `split`: `<root>/transforms_<split>.json`.
pub fn manifest_path(root: &Path, split: &str) -> PathBuf {
    root.join(format!("transforms_{split}.json"))
}

/// Load and validate the manifest for `split` under `root`.
pub fn load_manifest(root: &Path, split: &str) -> Result<Manifest, ManifestError> {
    let path = manifest_path(root, split);
    let file = File::open(&path).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest: Manifest = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ManifestError::Json { path, source })?;
    manifest.validate()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FRAMES: &str = r#"{
        "camera_angle_x": 0.6911112070083618,
        "frames": [
            {
                "file_path": "./train/r_0",
                "rotation": 0.012566370614359171,
                "transform_matrix": [
                    [1.0, 0.0, 0.0, 0.5],
                    [0.0, 1.0, 0.0, -1.5],
                    [0.0, 0.0, 1.0, 4.0],
                    [0.0, 0.0, 0.0, 1.0]
                ]
            },
            {
                "file_path": "./train/r_1",
                "transform_matrix": [
                    [1.0, 0.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0, 0.0],
                    [0.0, 0.0, 1.0, 0.0],
                    [0.0, 0.0, 0.0, 1.0]
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_frames_in_order() {
        let m = Manifest::from_json_str(TWO_FRAMES).unwrap();
        m.validate().unwrap();
        assert_eq!(m.frames.len(), 2);
        assert_eq!(m.frames[0].file_path, "./train/r_0");
        assert_eq!(m.frames[1].file_path, "./train/r_1");
    }

    #[test]
    fn test_transform_is_row_major() {
        let m = Manifest::from_json_str(TWO_FRAMES).unwrap();
        let t = m.frames[0].transform();
        assert_eq!(t[(0, 3)], 0.5);
        assert_eq!(t[(1, 3)], -1.5);
        assert_eq!(t[(2, 3)], 4.0);
        assert_eq!(t[(3, 0)], 0.0);
    }

    #[test]
    fn test_image_path_appends_png() {
        let m = Manifest::from_json_str(TWO_FRAMES).unwrap();
        let path = m.frames[1].image_path(Path::new("/data/lego"));
        assert_eq!(path, Path::new("/data/lego/./train/r_1.png"));
        assert_eq!(
            manifest_path(Path::new("/data/lego"), "val"),
            Path::new("/data/lego/transforms_val.json")
        );
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(Manifest::from_json_str(r#"{"frames": []}"#).is_err());
        assert!(Manifest::from_json_str(r#"{"camera_angle_x": 0.5, "frames": [{"file_path": "a"}]}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_and_bad_fov() {
        let empty = Manifest::from_json_str(r#"{"camera_angle_x": 0.5, "frames": []}"#).unwrap();
        assert!(matches!(empty.validate(), Err(ManifestError::NoFrames)));

        let mut m = Manifest::from_json_str(TWO_FRAMES).unwrap();
        m.camera_angle_x = 0.0;
        assert!(matches!(m.validate(), Err(ManifestError::InvalidFieldOfView(_))));

        let mut m = Manifest::from_json_str(TWO_FRAMES).unwrap();
        m.frames[1].transform_matrix[2][2] = f32::NAN;
        assert!(matches!(
            m.validate(),
            Err(ManifestError::NonFiniteTransform { frame: 1 })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path(), "train").unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("transforms_test.json"), "{ not json").unwrap();
        let err = load_manifest(dir.path(), "test").unwrap_err();
        assert!(matches!(err, ManifestError::Json { .. }));
    }
}
