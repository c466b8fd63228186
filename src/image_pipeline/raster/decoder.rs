use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::types::RasterBuffer;

/// Result of a direct decode attempt.
///
/// `Unsupported` is the only signal that sends an input through the RAW
/// conversion fallback; every other failure is returned as an error.
#[derive(Debug)]
pub enum DecodeOutcome {
    Decoded(RasterBuffer),
    Unsupported(String),
}

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodeOutcome>;
}
