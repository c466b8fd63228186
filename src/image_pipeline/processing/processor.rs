use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    ingest::{Ingested, IngestionPipeline},
    lut::{LutSpec, load_lut},
    preview::{downscale, encode_jpeg, jpeg_data_uri, output_path_for},
    processing::{
        config::ProcessorConfig,
        report::ProcessReport,
        timing::{PipelineTimings, Timer},
    },
    raster::{CodecDecoder, ImageDecoder},
    transform::apply_lut,
};

/// Applies LUT images to photographs.
///
/// Every operation is self-contained: nothing is cached between calls, so one
/// processor can serve concurrent callers.
pub struct LutProcessor<D: ImageDecoder> {
    ingestion: IngestionPipeline<D>,
    config: ProcessorConfig,
}

impl LutProcessor<CodecDecoder> {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            ingestion: IngestionPipeline::new(&config.converter),
            config,
        }
    }
}

impl<D: ImageDecoder> LutProcessor<D> {
    pub fn with_custom(ingestion: IngestionPipeline<D>, config: ProcessorConfig) -> Self {
        Self { ingestion, config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Loads the LUT and ingests the input in parallel. The transform must not
    /// start before both are done.
    fn load_inputs(
        &self,
        input: &Path,
        lut_path: &Path,
        scale_to: Option<u32>,
        timings: &mut PipelineTimings,
    ) -> Result<(LutSpec, Ingested)> {
        let ((lut, lut_timer), (ingested, ingest_timer)) = rayon::join(
            || {
                let timer = Timer::start("load_lut");
                (load_lut(lut_path, self.config.cube_tolerance), timer)
            },
            || {
                let timer = Timer::start("ingest");
                let ingested = match scale_to {
                    Some(max) => self.ingestion.ingest_scaled(input, max),
                    None => self.ingestion.ingest(input),
                };
                (ingested, timer)
            },
        );
        timings.record(lut_timer);
        timings.record(ingest_timer);

        // an Ok ingest dropped here still removes its artifact
        let lut = lut?;
        let ingested = ingested?;
        Ok((lut, ingested))
    }

    /// Applies the LUT at full resolution and writes `<stem>_lut.jpg` next to
    /// the input. Returns the output path.
    #[instrument(skip(self, input, lut_path), fields(input = %input.display(), lut = %lut_path.display()))]
    pub fn process(&self, input: &Path, lut_path: &Path) -> Result<PathBuf> {
        let output = output_path_for(input);
        self.process_to(input, lut_path, &output)?;
        Ok(output)
    }

    /// Like `process`, writing to an explicit path.
    pub fn process_to(&self, input: &Path, lut_path: &Path, output: &Path) -> Result<()> {
        let mut timings = PipelineTimings::new();
        let (lut, ingested) = self.load_inputs(input, lut_path, None, &mut timings)?;

        let transformed = {
            let _span = tracing::info_span!("transform", level = lut.level()).entered();
            let source = &ingested.raster;
            timings.time("transform", || apply_lut(source, &lut, source.order))
        };

        // downscaling only ever happens after the colour transform here
        let transformed = match self.config.max_output_dimension {
            Some(max) => timings.time("resize", || downscale(transformed, max))?,
            None => transformed,
        };

        let jpeg = timings.time("encode", || encode_jpeg(&transformed, self.config.output_quality))?;
        timings
            .time("write_output", || std::fs::write(output, &jpeg))
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", output.display(), e)))?;

        timings.log_summary("process");
        info!(
            width = transformed.width,
            height = transformed.height,
            output = %output.display(),
            "Processing complete"
        );
        Ok(())
    }

    /// Runs `process` and folds the outcome into a report. Failures are
    /// logged, never returned.
    pub fn process_report(&self, input: &Path, lut_path: &Path) -> ProcessReport {
        let result = self.process(input, lut_path);
        if let Err(e) = &result {
            error!("Processing error for {}: {}", input.display(), e);
        }
        ProcessReport::from(result)
    }

    /// Downscaled, untransformed JPEG of `input` as a data URI.
    #[instrument(skip(self, input), fields(input = %input.display()))]
    pub fn preview(&self, input: &Path, width: u32) -> Result<String> {
        let mut timings = PipelineTimings::new();
        let Ingested {
            raster,
            artifact: _artifact,
        } = timings.time("ingest", || self.ingestion.ingest_scaled(input, width))?;

        let small = timings.time("resize", || downscale(raster, width))?;
        let jpeg = timings.time("encode", || encode_jpeg(&small, self.config.preview_quality))?;

        timings.log_summary("preview");
        Ok(jpeg_data_uri(&jpeg))
    }

    /// LUT-applied preview as a data URI. The input is downscaled before the
    /// transform.
    #[instrument(skip(self, input, lut_path), fields(input = %input.display(), lut = %lut_path.display()))]
    pub fn lut_preview(&self, input: &Path, lut_path: &Path) -> Result<String> {
        let width = self.config.preview_width;
        let mut timings = PipelineTimings::new();
        let (
            lut,
            Ingested {
                raster,
                artifact: _artifact,
            },
        ) = self.load_inputs(input, lut_path, Some(width), &mut timings)?;

        let small = timings.time("resize", || downscale(raster, width))?;
        let transformed = timings.time("transform", || apply_lut(&small, &lut, small.order));
        let jpeg = timings.time("encode", || {
            encode_jpeg(&transformed, self.config.preview_quality)
        })?;

        timings.log_summary("lut_preview");
        Ok(jpeg_data_uri(&jpeg))
    }

    /// `preview`, with failures reduced to "no preview available".
    pub fn try_preview(&self, input: &Path, width: u32) -> Option<String> {
        self.preview(input, width)
            .inspect_err(|e| warn!("No preview for {}: {}", input.display(), e))
            .ok()
    }

    /// `lut_preview`, with failures reduced to "no preview available".
    pub fn try_lut_preview(&self, input: &Path, lut_path: &Path) -> Option<String> {
        self.lut_preview(input, lut_path)
            .inspect_err(|e| warn!("No LUT preview for {}: {}", input.display(), e))
            .ok()
    }
}
