//! Preview and output encoding module
//!
//! Fit-inside downscaling, JPEG encoding and data-URI packing.

mod encode;
mod resize;

pub use encode::{OUTPUT_QUALITY, PREVIEW_QUALITY, encode_jpeg, jpeg_data_uri, output_path_for};
pub use resize::{downscale, fit_inside};
