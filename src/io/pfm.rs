//! Portable Float Map (PFM) reader for depth maps.
//!
//! Layout:
//! ```text
//! PF | Pf          3-channel or 1-channel
//! <width> <height>
//! <scale>         negative = little-endian, positive = big-endian
//! <f32 data>      rows stored bottom-to-top
//! ```
//!
//! Blender scenes ship depth as PFM but nothing in the ray/color pipeline
//! reads it, so this module is only compiled with the `depth` feature.

use crate::core::PixelGrid;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading a PFM file.
#[derive(Debug, Error)]
pub enum PfmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PFM header: {0}")]
    InvalidHeader(String),
}

/// A decoded float map. Rows are top-to-bottom; each pixel holds `channels` floats.
#[derive(Debug, Clone)]
pub struct FloatMap {
    pub channels: usize,
    pub scale: f32,
    pub data: PixelGrid<Vec<f32>>,
}

impl FloatMap {
    /// First channel of every pixel, row-major. For depth files this is the depth.
    pub fn first_channel(&self) -> Vec<f32> {
        self.data.as_slice().iter().map(|p| p[0]).collect()
    }
}

/// Read a PFM file from disk.
pub fn read_pfm(path: &Path) -> Result<FloatMap, PfmError> {
    let file = File::open(path)?;
    parse_pfm(BufReader::new(file))
}

fn header_line<R: BufRead>(reader: &mut R) -> Result<String, PfmError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PfmError::InvalidHeader("unexpected end of file".into()));
    }
    Ok(line.trim().to_string())
}

/// Parse PFM bytes from any buffered reader.
pub fn parse_pfm<R: BufRead>(mut reader: R) -> Result<FloatMap, PfmError> {
    let channels = match header_line(&mut reader)?.as_str() {
        "PF" => 3,
        "Pf" => 1,
        other => return Err(PfmError::InvalidHeader(format!("bad magic {other:?}"))),
    };

    let dims = header_line(&mut reader)?;
    let mut parts = dims.split_whitespace().map(str::parse::<u32>);
    let (width, height) = match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(w)), Some(Ok(h)), None) => (w, h),
        _ => return Err(PfmError::InvalidHeader(format!("bad dimensions {dims:?}"))),
    };

    let scale_line = header_line(&mut reader)?;
    let scale: f32 = scale_line
        .parse()
        .map_err(|_| PfmError::InvalidHeader(format!("bad scale {scale_line:?}")))?;

    let row_len = width as usize * channels;
    let mut rows: Vec<Vec<f32>> = Vec::with_capacity(height as usize);
    for _ in 0..height {
        let mut row = vec![0.0f32; row_len];
        if scale < 0.0 {
            reader.read_f32_into::<LittleEndian>(&mut row)?;
        } else {
            reader.read_f32_into::<BigEndian>(&mut row)?;
        }
        rows.push(row);
    }
    // stored bottom row first
    rows.reverse();

    let pixels: Vec<Vec<f32>> = rows
        .iter()
        .flat_map(|row| row.chunks_exact(channels).map(<[f32]>::to_vec))
        .collect();
    let data = PixelGrid::from_flat(width, height, pixels)
        .map_err(|e| PfmError::InvalidHeader(e.to_string()))?;

    Ok(FloatMap {
        channels,
        scale: scale.abs(),
        data,
    })
}
