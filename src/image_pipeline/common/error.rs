use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid LUT: {0}")]
    InvalidLut(String),

    #[error("Platform {0} not supported for RAW conversion fallback")]
    UnsupportedPlatform(String),

    #[error("Failed to convert RAW image using {tool} ({platform}): {reason}")]
    RawConversionFailed {
        platform: String,
        tool: String,
        reason: String,
    },

    #[error("Converter output file not found: {}", .0.display())]
    ConversionOutputMissing(PathBuf),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
