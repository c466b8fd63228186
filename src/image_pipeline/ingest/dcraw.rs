//! Conversion through `dcraw`.
//!
//! dcraw writes its TIFF next to its input, so the source is first copied to a
//! temp path keeping its extension and the tool runs on the copy. The user's
//! file is never touched.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::ingest::artifact::{ConversionArtifact, unique_temp_path};
use crate::image_pipeline::ingest::converter::{ExternalTool, RawConverter};
use crate::image_pipeline::ingest::platform::Platform;

/// Camera white balance, TIFF output, 16 bits per sample.
const DCRAW_FLAGS: [&str; 3] = ["-w", "-T", "-6"];

pub struct DcrawConverter {
    tool: ExternalTool,
    temp_dir: PathBuf,
    platform: Platform,
}

impl DcrawConverter {
    pub fn new(tool: ExternalTool, temp_dir: PathBuf, platform: Platform) -> Self {
        Self {
            tool,
            temp_dir,
            platform,
        }
    }
}

impl RawConverter for DcrawConverter {
    fn name(&self) -> &'static str {
        "dcraw"
    }

    fn convert(&self, input: &Path) -> Result<ConversionArtifact> {
        let extension = input
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        // Dropped on return: the copy is only needed while dcraw runs.
        let scratch = ConversionArtifact::new(unique_temp_path(&self.temp_dir, "raw", &extension));
        std::fs::copy(input, scratch.path()).map_err(|e| {
            PipelineError::InputReadError(format!("{}: {}", input.display(), e))
        })?;

        let output = ConversionArtifact::new(scratch.path().with_extension("tiff"));
        self.tool
            .run(DCRAW_FLAGS.iter().map(OsStr::new).chain([scratch.path().as_os_str()]))
            .map_err(|reason| PipelineError::RawConversionFailed {
                platform: self.platform.to_string(),
                tool: self.name().to_string(),
                reason,
            })?;

        if !output.path().exists() {
            return Err(PipelineError::ConversionOutputMissing(output.path().to_path_buf()));
        }
        info!("dcraw conversion success: {}", output.path().display());
        Ok(output)
    }
}
