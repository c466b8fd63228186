//! Decoded raster types

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Byte order of the colour channels inside one pixel.
///
/// Alpha, when present, is always the fourth byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Offsets of the red, green and blue bytes within a pixel.
    pub fn offsets(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }
}

/// A decoded 8-bit image with interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// 3 or 4
    pub channels: usize,
    /// Order of the colour bytes
    pub order: ChannelOrder,
    /// Interleaved pixel bytes, `width * height * channels` long
    pub data: Vec<u8>,
}

impl RasterBuffer {
    pub fn new(
        width: u32,
        height: u32,
        channels: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(PipelineError::DecodeFailed(format!(
                "unsupported channel count {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(PipelineError::DecodeFailed(format!(
                "buffer holds {} bytes, expected {} for {}x{}x{}",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            order,
            data,
        })
    }

    /// Converts a decoded image to 8-bit RGB or RGBA, keeping alpha only if the
    /// source carried it.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            Self {
                width,
                height,
                channels: 4,
                order: ChannelOrder::Rgb,
                data: image.to_rgba8().into_raw(),
            }
        } else {
            Self {
                width,
                height,
                channels: 3,
                order: ChannelOrder::Rgb,
                data: image.to_rgb8().into_raw(),
            }
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a copy with its colour bytes rearranged into `order`.
    pub fn to_order(&self, order: ChannelOrder) -> Self {
        if order == self.order {
            return self.clone();
        }
        let mut data = self.data.clone();
        for pixel in data.chunks_exact_mut(self.channels) {
            pixel.swap(0, 2);
        }
        Self {
            data,
            order,
            ..*self
        }
    }

    /// Converts back into an `image` crate buffer in RGB(A) order.
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let rgb = self.to_order(ChannelOrder::Rgb);
        let (width, height) = (rgb.width, rgb.height);
        let image = if rgb.has_alpha() {
            RgbaImage::from_raw(width, height, rgb.data).map(DynamicImage::ImageRgba8)
        } else {
            RgbImage::from_raw(width, height, rgb.data).map(DynamicImage::ImageRgb8)
        };
        image.ok_or_else(|| {
            PipelineError::EncodeError(format!("raster buffer does not match {width}x{height}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_length() {
        let result = RasterBuffer::new(2, 2, 3, ChannelOrder::Rgb, vec![0; 11]);
        assert!(matches!(result, Err(PipelineError::DecodeFailed(_))));
    }

    #[test]
    fn test_rejects_two_channels() {
        let result = RasterBuffer::new(1, 1, 2, ChannelOrder::Rgb, vec![0; 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_order_swaps_red_and_blue_only() {
        let rgba = RasterBuffer::new(1, 1, 4, ChannelOrder::Rgb, vec![10, 20, 30, 40]).unwrap();
        let bgra = rgba.to_order(ChannelOrder::Bgr);
        assert_eq!(bgra.data, vec![30, 20, 10, 40]);
        assert_eq!(bgra.order, ChannelOrder::Bgr);
        assert_eq!(bgra.to_order(ChannelOrder::Rgb), rgba);
    }

    #[test]
    fn test_dynamic_round_trip_keeps_alpha() {
        let raster = RasterBuffer::new(1, 2, 4, ChannelOrder::Bgr, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let image = raster.to_dynamic().unwrap();
        assert!(image.color().has_alpha());
        let back = RasterBuffer::from_dynamic(&image);
        assert_eq!(back.order, ChannelOrder::Rgb);
        assert_eq!(back.data, vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }
}
