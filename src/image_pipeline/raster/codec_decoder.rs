//! Direct decoder backed by the `image` crate.
//!
//! Handles PNG, JPEG and TIFF (including the 16-bit TIFFs produced by dcraw,
//! which are reduced to 8 bits per channel). Camera RAW files are reported as
//! unsupported so the caller can route them through a converter.

use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raster::decoder::{DecodeOutcome, ImageDecoder};
use crate::image_pipeline::raster::types::RasterBuffer;

/// Extensions of camera RAW formats that are never handed to the codec.
///
/// Most of them are TIFF containers, so the codec would otherwise decode at
/// best the embedded thumbnail.
pub const RAW_EXTENSIONS: &[&str] = &["orf", "cr2", "nef", "arw", "dng"];

pub fn is_raw_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            RAW_EXTENSIONS
                .iter()
                .any(|raw| raw.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CodecDecoder;

impl CodecDecoder {
    /// Decodes a file with no RAW short-circuit. Used for converter output.
    pub fn decode_file(&self, path: &Path) -> Result<DecodeOutcome> {
        let reader = ImageReader::open(path)
            .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;

        let image = match reader.decode() {
            Ok(image) => image,
            Err(ImageError::Unsupported(e)) => {
                return Ok(DecodeOutcome::Unsupported(e.to_string()));
            }
            Err(ImageError::IoError(e)) => {
                return Err(PipelineError::InputReadError(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
            // recognised format with corrupt content
            Err(e) => {
                return Err(PipelineError::DecodeFailed(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(classify(&image, path))
    }
}

/// Turns a decoded image into a stage-1 outcome. An image with no pixels
/// counts as unsupported.
fn classify(image: &DynamicImage, path: &Path) -> DecodeOutcome {
    let raster = RasterBuffer::from_dynamic(image);
    if raster.is_empty() {
        return DecodeOutcome::Unsupported(format!(
            "{} decoded to an empty image",
            path.display()
        ));
    }

    debug!(
        width = raster.width,
        height = raster.height,
        channels = raster.channels,
        "Decoded {}",
        path.display()
    );
    DecodeOutcome::Decoded(raster)
}

impl ImageDecoder for CodecDecoder {
    fn decode(&self, path: &Path) -> Result<DecodeOutcome> {
        if is_raw_extension(path) {
            debug!("{} has a RAW extension, skipping direct decode", path.display());
            return Ok(DecodeOutcome::Unsupported(format!(
                "{} is a camera RAW file",
                path.display()
            )));
        }
        self.decode_file(path)
    }
}
