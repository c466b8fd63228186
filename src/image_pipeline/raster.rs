//! Raster decoding module
//!
//! In-memory image representation and the direct-decode stage.

mod codec_decoder;
mod decoder;
pub mod types;

pub use codec_decoder::{CodecDecoder, RAW_EXTENSIONS, is_raw_extension};
pub use decoder::{DecodeOutcome, ImageDecoder};
pub use types::{ChannelOrder, RasterBuffer};
