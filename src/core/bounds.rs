//! Axis-aligned scene bounds and normalisation into a canonical cube.

use crate::core::projection::GeometryError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Scene bounding box with derived center and half-extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
    center: Vector3<f32>,
    radius: Vector3<f32>,
}

impl SceneBounds {
    /// Build from two corners. Every axis needs `min < max`.
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Result<Self, GeometryError> {
        for axis in 0..3 {
            if !(min[axis] < max[axis]) {
                return Err(GeometryError::DegenerateBounds {
                    axis,
                    min: min[axis],
                    max: max[axis],
                });
            }
        }
        let center = (min + max) / 2.0;
        Ok(Self {
            min,
            max,
            center,
            radius: max - center,
        })
    }

    /// Build from `[min_x, min_y, min_z, max_x, max_y, max_z]`.
    pub fn from_array(b: [f32; 6]) -> Result<Self, GeometryError> {
        Self::new(Vector3::new(b[0], b[1], b[2]), Vector3::new(b[3], b[4], b[5]))
    }

    pub fn center(&self) -> Vector3<f32> {
        self.center
    }

    pub fn radius(&self) -> Vector3<f32> {
        self.radius
    }

    /// `(p - center) / radius`, elementwise. The box maps onto [-1, 1]^3.
    pub fn normalize(&self, point: &Vector3<f32>) -> Vector3<f32> {
        (point - self.center).component_div(&self.radius)
    }
}
