use image::imageops::FilterType;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::RasterBuffer;

/// Dimensions that fit `width`x`height` inside a `max_dimension` square,
/// preserving aspect ratio. Never upscales.
pub fn fit_inside(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let larger = width.max(height);
    if larger <= max_dimension || max_dimension == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / larger as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    if width >= height {
        (max_dimension, scaled(height))
    } else {
        (scaled(width), max_dimension)
    }
}

/// Downscales `raster` so its larger dimension is at most `max_dimension`.
/// Smaller rasters are returned unchanged.
pub fn downscale(raster: RasterBuffer, max_dimension: u32) -> Result<RasterBuffer> {
    let (width, height) = fit_inside(raster.width, raster.height, max_dimension);
    if (width, height) == (raster.width, raster.height) {
        return Ok(raster);
    }

    debug!(
        "Resizing {}x{} to {}x{}",
        raster.width, raster.height, width, height
    );
    let order = raster.order;
    let resized = raster
        .to_dynamic()?
        .resize_exact(width, height, FilterType::Lanczos3);
    Ok(RasterBuffer::from_dynamic(&resized).to_order(order))
}
