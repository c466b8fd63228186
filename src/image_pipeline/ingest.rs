//! RAW ingestion module
//!
//! Turns an arbitrary image path into a `RasterBuffer`, falling back to a
//! platform converter (sips or dcraw) when the codec cannot read the file.

mod artifact;
mod converter;
mod dcraw;
mod pipeline;
mod platform;
mod sips;


pub use artifact::{ConversionArtifact, unique_temp_path};
pub use converter::{ExternalTool, RawConverter};
pub use dcraw::DcrawConverter;
pub use pipeline::{Ingested, IngestionPipeline};
pub use platform::{ConverterChoice, ConverterSettings, Platform, select_converter};
pub use sips::SipsConverter;
