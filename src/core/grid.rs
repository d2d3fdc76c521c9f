//! Row-major H×W pixel grids.
//!
//! Per-frame data (decoded pixels, composited colors, rays) travels as a
//! grid, pixel (0,0) first, then along the row. The flattened dataset layout
//! takes the buffer back out with `into_flat`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a flat buffer does not match the requested shape.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot reshape {len} elements into a {height}x{width} grid")]
pub struct ShapeError {
    pub len: usize,
    pub width: u32,
    pub height: u32,
}

/// A 2-D grid of per-pixel values stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelGrid<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T> PixelGrid<T> {
    /// Reshape a flat row-major sequence into a `height × width` grid.
    pub fn from_flat(width: u32, height: u32, data: Vec<T>) -> Result<Self, ShapeError> {
        if data.len() != width as usize * height as usize {
            return Err(ShapeError {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every pixel in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Apply `f` to every pixel, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> PixelGrid<U> {
        PixelGrid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: u32, col: u32) -> Option<&T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row as usize * self.width as usize + col as usize)
    }

    /// One image row as a slice.
    pub fn row(&self, row: u32) -> Option<&[T]> {
        if row >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = row as usize * w;
        Some(&self.data[start..start + w])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on zero, and a zero-width grid has no data anyway
        self.data.chunks_exact(self.width.max(1) as usize)
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Give back the flat row-major buffer.
    pub fn into_flat(self) -> Vec<T> {
        self.data
    }
}
