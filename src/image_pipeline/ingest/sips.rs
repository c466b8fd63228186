//! Conversion through the `sips` utility bundled with macOS.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::ingest::artifact::{ConversionArtifact, unique_temp_path};
use crate::image_pipeline::ingest::converter::{ExternalTool, RawConverter};
use crate::image_pipeline::ingest::platform::Platform;

pub struct SipsConverter {
    tool: ExternalTool,
    temp_dir: PathBuf,
    platform: Platform,
}

impl SipsConverter {
    pub fn new(tool: ExternalTool, temp_dir: PathBuf, platform: Platform) -> Self {
        Self {
            tool,
            temp_dir,
            platform,
        }
    }

    fn run(&self, args: &[&OsStr], output: ConversionArtifact) -> Result<ConversionArtifact> {
        self.tool
            .run(args)
            .map_err(|reason| PipelineError::RawConversionFailed {
                platform: self.platform.to_string(),
                tool: self.name().to_string(),
                reason,
            })?;

        if !output.path().exists() {
            return Err(PipelineError::ConversionOutputMissing(output.path().to_path_buf()));
        }
        info!("sips conversion success: {}", output.path().display());
        Ok(output)
    }
}

impl RawConverter for SipsConverter {
    fn name(&self) -> &'static str {
        "sips"
    }

    fn convert(&self, input: &Path) -> Result<ConversionArtifact> {
        let output = ConversionArtifact::new(unique_temp_path(&self.temp_dir, "temp", ".jpg"));
        let out = output.path().to_path_buf();
        self.run(
            &[
                OsStr::new("-s"),
                OsStr::new("format"),
                OsStr::new("jpeg"),
                input.as_os_str(),
                OsStr::new("--out"),
                out.as_os_str(),
            ],
            output,
        )
    }

    fn convert_scaled(&self, input: &Path, max_dimension: u32) -> Result<ConversionArtifact> {
        let output = ConversionArtifact::new(unique_temp_path(&self.temp_dir, "preview", ".jpg"));
        let out = output.path().to_path_buf();
        let max = max_dimension.to_string();
        self.run(
            &[
                OsStr::new("-Z"),
                OsStr::new(&max),
                input.as_os_str(),
                OsStr::new("--out"),
                out.as_os_str(),
                OsStr::new("-s"),
                OsStr::new("format"),
                OsStr::new("jpeg"),
            ],
            output,
        )
    }
}
