//! LUT image pipeline module
//!
//! Loads a 3D LUT stored as a flattened image, ingests photographs (falling
//! back to an external converter for camera RAW files), applies the LUT and
//! encodes the result as a JPEG file or a preview data URI.

pub mod common;
pub mod ingest;
pub mod lut;
pub mod preview;
pub mod processing;
pub mod raster;
pub mod transform;

pub use common::{
    PipelineError,
    Result,
};

pub use raster::{
    ChannelOrder,
    RasterBuffer,
    ImageDecoder,
    CodecDecoder,
};

pub use lut::{
    LutSpec,
    load_lut,
};

pub use ingest::{
    ConversionArtifact,
    ConverterChoice,
    ExternalTool,
    IngestionPipeline,
    Platform,
    RawConverter,
};

pub use processing::{
    LutProcessor,
    ProcessorConfig,
    ProcessorConfigBuilder,
    ProcessReport,
};

pub use transform::apply_lut;
