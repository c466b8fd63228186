use std::path::Path;

use image::ImageReader;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::lut::types::LutSpec;
use crate::image_pipeline::raster::RasterBuffer;

/// Decodes a LUT image (normally PNG) and derives its cube geometry.
///
/// Any decode failure is reported as `InvalidLut`.
pub fn load_lut(path: &Path, tolerance: usize) -> Result<LutSpec> {
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PipelineError::InvalidLut(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| PipelineError::InvalidLut(format!("{}: {}", path.display(), e)))?;

    let raster = RasterBuffer::from_dynamic(&image);
    let lut = LutSpec::from_raw(
        raster.width,
        raster.height,
        raster.channels,
        raster.data,
        tolerance,
    )?;

    debug!(
        level = lut.level(),
        width = lut.width(),
        height = lut.height(),
        channels = lut.channels(),
        "Loaded LUT {}",
        path.display()
    );
    Ok(lut)
}
