//! LUT geometry types

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Pixel-count slack allowed between `level³` and the LUT image area.
pub const DEFAULT_CUBE_TOLERANCE: usize = 10;

/// A 3D lookup table stored as a linearised cube inside a 2D image.
///
/// Entries are in RGB(A) byte order, red varying fastest, then green, then
/// blue. The 2D shape is only a packing: entry `i` is pixel `i` in row-major
/// order, whatever the width.
///
/// Only [`LutSpec::from_raw`] builds one, so a `LutSpec` always holds at least
/// one pixel and a buffer matching its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LutSpec {
    level: usize,
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

/// `round(cbrt(pixels))`.
pub fn cube_level(pixel_count: usize) -> usize {
    (pixel_count as f64).cbrt().round() as usize
}

impl LutSpec {
    /// Builds a LUT from decoded pixels, deriving and validating the cube level.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
        tolerance: usize,
    ) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(PipelineError::InvalidLut(format!(
                "expected 3 or 4 channels, got {channels}"
            )));
        }
        let pixels = width as usize * height as usize;
        if pixels == 0 {
            return Err(PipelineError::InvalidLut("LUT image is empty".to_string()));
        }
        if data.len() != pixels * channels {
            return Err(PipelineError::InvalidLut(format!(
                "buffer holds {} bytes, expected {}",
                data.len(),
                pixels * channels
            )));
        }

        let level = cube_level(pixels);
        if level.pow(3).abs_diff(pixels) > tolerance {
            return Err(PipelineError::InvalidLut(format!(
                "{width}x{height} ({pixels} pixels) is not a cube: nearest level {level} needs {} pixels",
                level.pow(3)
            )));
        }

        Ok(Self {
            level,
            width,
            height,
            channels,
            data,
        })
    }

    /// Side length of the cube
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 3 or 4
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Row-major pixel bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// RGB of cube entry `index`, read through the row-major 2D packing.
    ///
    /// Indices past the end of a short (within tolerance) image read the last
    /// pixel.
    #[inline]
    pub fn entry(&self, index: usize) -> [u8; 3] {
        let width = self.width as usize;
        let index = index.min(self.pixel_count().saturating_sub(1));
        let (y, x) = (index / width, index % width);
        let offset = (y * width + x) * self.channels;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }
}
