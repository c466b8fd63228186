use std::path::Path;

use tracing::{error, info, instrument};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    ingest::{
        artifact::ConversionArtifact,
        converter::RawConverter,
        platform::{ConverterSettings, Platform, select_converter},
    },
    raster::{CodecDecoder, DecodeOutcome, ImageDecoder, RasterBuffer},
};

/// A decoded input plus the temp file it was decoded from, if any.
///
/// Dropping this value deletes the artifact.
#[derive(Debug)]
pub struct Ingested {
    pub raster: RasterBuffer,
    pub artifact: Option<ConversionArtifact>,
}

/// Direct decode first, external conversion second.
pub struct IngestionPipeline<D: ImageDecoder> {
    decoder: D,
    converter: Option<Box<dyn RawConverter>>,
    platform: Platform,
}

impl IngestionPipeline<CodecDecoder> {
    pub fn new(settings: &ConverterSettings) -> Self {
        let platform = Platform::current();
        Self {
            decoder: CodecDecoder,
            converter: select_converter(settings, &platform),
            platform,
        }
    }
}

impl<D: ImageDecoder> IngestionPipeline<D> {
    pub fn with_custom(
        decoder: D,
        converter: Option<Box<dyn RawConverter>>,
        platform: Platform,
    ) -> Self {
        Self {
            decoder,
            converter,
            platform,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Decodes `input` at full resolution.
    pub fn ingest(&self, input: &Path) -> Result<Ingested> {
        self.ingest_with(input, None)
    }

    /// Decodes `input`, letting the converter downscale when it can. The
    /// result may still be larger than `max_dimension`.
    pub fn ingest_scaled(&self, input: &Path, max_dimension: u32) -> Result<Ingested> {
        self.ingest_with(input, Some(max_dimension))
    }

    #[instrument(skip(self, input), fields(input = %input.display()))]
    fn ingest_with(&self, input: &Path, max_dimension: Option<u32>) -> Result<Ingested> {
        let reason = {
            let _span = tracing::info_span!("direct_decode").entered();
            match self.decoder.decode(input)? {
                DecodeOutcome::Decoded(raster) => {
                    return Ok(Ingested {
                        raster,
                        artifact: None,
                    });
                }
                DecodeOutcome::Unsupported(reason) => reason,
            }
        };

        info!(%reason, "Direct decode unsupported, trying RAW conversion");
        let converter = self
            .converter
            .as_ref()
            .ok_or_else(|| PipelineError::UnsupportedPlatform(self.platform.to_string()))?;

        let artifact = {
            let _span = tracing::info_span!("raw_conversion", tool = converter.name()).entered();
            let converted = match max_dimension {
                Some(max) => converter.convert_scaled(input, max),
                None => converter.convert(input),
            };
            converted.inspect_err(|e| error!(direct_decode = %reason, "Fallback conversion failed: {}", e))?
        };

        let raster = {
            let _span = tracing::info_span!("decode_converted").entered();
            match CodecDecoder.decode_file(artifact.path())? {
                DecodeOutcome::Decoded(raster) => raster,
                DecodeOutcome::Unsupported(why) => {
                    let size = std::fs::metadata(artifact.path()).map(|m| m.len()).unwrap_or(0);
                    return Err(PipelineError::DecodeFailed(format!(
                        "{} output unreadable ({} bytes): {}",
                        converter.name(),
                        size,
                        why
                    )));
                }
            }
        };

        Ok(Ingested {
            raster,
            artifact: Some(artifact),
        })
    }
}
